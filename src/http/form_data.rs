use actix_multipart::Multipart;
use actix_web::{dev::Payload, web, FromRequest, HttpMessage, HttpRequest};
use bytes::{Bytes, BytesMut};
use futures::{future::LocalBoxFuture, StreamExt};
use std::collections::HashMap;
use thiserror::Error;

use super::Error;
use crate::{types, App};

/// A file picked in a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content: Bytes,
}

/// Submitted HTML form, either url-encoded or multipart.
///
/// Repeated fields keep their last value. File inputs left empty
/// by the browser are skipped.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl FormData {
    /// Value of a text field, empty if the field was not sent.
    #[must_use]
    pub fn get(&self, name: &str) -> &str {
        self.fields.get(name).map_or("", String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

#[derive(Debug, Error)]
#[error("Received a malformed form body")]
struct MalformedForm;

#[derive(Debug, Error)]
#[error("Form body exceeds {0} bytes")]
struct FormTooLarge(usize);

impl FromRequest for FormData {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let limit = req
            .app_data::<web::Data<App>>()
            .map_or(usize::MAX, |app| app.config.media.max_upload_bytes);

        if req.content_type() == mime::MULTIPART_FORM_DATA.essence_str() {
            let multipart = Multipart::new(req.headers(), payload.take());
            Box::pin(read_multipart(multipart, limit))
        } else {
            let form = web::Form::<Vec<(String, String)>>::from_request(req, payload);
            Box::pin(async move {
                let form = form.await.map_err(|e| {
                    Error::from_context(types::Error::BadRequest, MalformedForm)
                        .attach_printable(e.to_string())
                })?;

                Ok(Self {
                    fields: form.into_inner().into_iter().collect(),
                    files: HashMap::new(),
                })
            })
        }
    }
}

async fn read_multipart(mut multipart: Multipart, limit: usize) -> Result<FormData, Error> {
    let malformed = |e: actix_multipart::MultipartError| {
        Error::from_context(types::Error::BadRequest, MalformedForm).attach_printable(e.to_string())
    };

    let mut data = FormData::default();
    let mut total = 0usize;

    while let Some(field) = multipart.next().await {
        let mut field = field.map_err(malformed)?;
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(ToString::to_string);

        let mut content = BytesMut::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(malformed)?;
            total += chunk.len();
            if total > limit {
                return Err(Error::from_context(
                    types::Error::BadRequest,
                    FormTooLarge(limit),
                ));
            }
            content.extend_from_slice(&chunk);
        }

        match file_name {
            Some(file_name) if file_name.is_empty() && content.is_empty() => {}
            Some(file_name) => {
                let file = UploadedFile {
                    file_name,
                    content: content.freeze(),
                };
                data.files.insert(name, file);
            }
            None => {
                let value = String::from_utf8(content.to_vec()).map_err(|e| {
                    Error::from_context(types::Error::BadRequest, MalformedForm)
                        .attach_printable(e.to_string())
                })?;
                data.fields.insert(name, value);
            }
        }
    }

    Ok(data)
}
