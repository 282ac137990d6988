use std::io;

use url::Url;

/// The system's default handler for external links.
pub trait ExternalOpener {
    fn open(&self, url: &Url) -> io::Result<()>;
}

pub struct SystemOpener;

impl ExternalOpener for SystemOpener {
    fn open(&self, url: &Url) -> io::Result<()> {
        open::that(url.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("invalid navigation target {target:?}: {source}")]
    Invalid {
        target: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to open {url}: {source}")]
    Open {
        url: Url,
        #[source]
        source: io::Error,
    },
}

/// Sends a navigation attempt from the UI surface to the external handler
/// instead of letting the embedded view follow it.
pub fn redirect_navigation(
    opener: &dyn ExternalOpener,
    target: &str,
) -> Result<Url, NavigationError> {
    let url = Url::parse(target).map_err(|source| NavigationError::Invalid {
        target: target.to_string(),
        source,
    })?;
    opener
        .open(&url)
        .map_err(|source| NavigationError::Open {
            url: url.clone(),
            source,
        })?;
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingOpener {
        opened: RefCell<Vec<String>>,
        fail: bool,
    }

    impl ExternalOpener for RecordingOpener {
        fn open(&self, url: &Url) -> io::Result<()> {
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no handler"));
            }
            self.opened.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    #[test]
    fn valid_target_is_opened_externally() {
        let opener = RecordingOpener::default();
        let url = redirect_navigation(&opener, "https://elm-lang.org/docs").unwrap();
        assert_eq!(url.as_str(), "https://elm-lang.org/docs");
        assert_eq!(opener.opened.into_inner(), vec!["https://elm-lang.org/docs"]);
    }

    #[test]
    fn relative_target_is_rejected_without_opening() {
        let opener = RecordingOpener::default();
        let err = redirect_navigation(&opener, "index.html#top").unwrap_err();
        assert!(matches!(err, NavigationError::Invalid { .. }));
        assert!(opener.opened.borrow().is_empty());
    }

    #[test]
    fn handler_failure_is_reported() {
        let opener = RecordingOpener {
            fail: true,
            ..RecordingOpener::default()
        };
        let err = redirect_navigation(&opener, "https://example.com").unwrap_err();
        assert!(matches!(err, NavigationError::Open { .. }));
    }
}
