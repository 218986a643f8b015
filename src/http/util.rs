use actix_web::{http::header, HttpResponse};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped in query values. Unreserved characters and
/// `/` are kept readable.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// `302 Found` pointing to `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Login page that sends the user back to `next` afterwards.
pub fn login_url(next: &str) -> String {
    format!(
        "/auth/login/?next={}",
        percent_encoding::utf8_percent_encode(next, QUERY_VALUE)
    )
}

pub fn post_url(username: &str, post_id: impl std::fmt::Display) -> String {
    format!("/{username}/{post_id}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url() {
        assert_eq!(login_url("/new/"), "/auth/login/?next=/new/");
        assert_eq!(
            login_url("/follow/?page=2"),
            "/auth/login/?next=/follow/%3Fpage%3D2"
        );
        assert_eq!(login_url("/тест/"), "/auth/login/?next=/%D1%82%D0%B5%D1%81%D1%82/");
        assert_eq!(
            login_url("/a b/?x=1&y=~z"),
            "/auth/login/?next=/a%20b/%3Fx%3D1%26y%3D~z"
        );
    }

    #[test]
    fn test_post_url() {
        assert_eq!(post_url("auth", 3), "/auth/3/");
    }
}
