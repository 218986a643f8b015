use error_stack::{Context, Report};

/// Turns every error figment collected while extracting the
/// configuration into a readable attachment, including the key
/// and the source (file or environment variable) it came from.
pub trait FigmentErrorAttachable<T: Context> {
    fn attach_figment_error(self, err: figment::Error) -> Report<T>;
}

impl<T: Context> FigmentErrorAttachable<T> for Report<T> {
    fn attach_figment_error(self, errors: figment::Error) -> Report<T> {
        errors.into_iter().fold(self, |report, error| {
            let mut report = report.attach_printable(error.kind.to_string());

            if let (Some(profile), Some(md)) = (&error.profile, &error.metadata) {
                if !error.path.is_empty() {
                    let key = md.interpolate(profile, &error.path);
                    report = report.attach_printable(format!("for key {key:?}"));
                }
            }

            match error.metadata.as_ref() {
                Some(md) => match &md.source {
                    Some(source) => report.attach_printable(format!("in {source} {}", md.name)),
                    None => report.attach_printable(format!("in {}", md.name)),
                },
                None => report,
            }
        })
    }
}
