use std::path::PathBuf;

use serde::{Deserialize, Serialize, Serializer};

use crate::{FileError, FileRecord, ManifestRecord, RequestId};

/// Requests the UI process sends across the boundary to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "channel", rename_all = "kebab-case")]
pub enum UiToHost {
    GetFile { request_id: RequestId },
}

/// Messages the host sends to the UI process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "channel", rename_all = "kebab-case")]
pub enum HostToUi {
    /// Dialog outcome for one `get-file`; zero or one path.
    GetFileReply {
        request_id: RequestId,
        paths: Vec<PathBuf>,
    },
    /// Watched assets changed; reload the UI surface.
    Reload,
}

/// Messages the embedded UI component sends into the UI process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "port", rename_all = "camelCase")]
pub enum InboundPort {
    /// Without a path the host is asked for a dialog; with one, the path is
    /// read relative to the install directory.
    FetchFile {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<PathBuf>,
    },
    FetchPackageJson,
}

/// Messages the UI process pushes to the embedded UI component.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "port", content = "payload", rename_all = "camelCase")]
pub enum OutboundPort {
    File(FileRecord),
    FileError(FileError),
    PackageJson(#[serde(serialize_with = "serialize_manifest")] ManifestRecord),
}

impl OutboundPort {
    pub fn port_name(&self) -> &'static str {
        match self {
            OutboundPort::File(_) => "file",
            OutboundPort::FileError(_) => "fileError",
            OutboundPort::PackageJson(_) => "packageJson",
        }
    }
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    error: &'a FileError,
}

fn serialize_manifest<S: Serializer>(
    record: &ManifestRecord,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match record {
        Ok(value) => value.serialize(serializer),
        Err(error) => ErrorEnvelope { error }.serialize(serializer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;

    #[test]
    fn outbound_ports_use_ui_port_names() {
        let file = OutboundPort::File(FileRecord::from_read(
            Path::new("/tmp/sample.json"),
            "{}".to_string(),
        ));
        assert_eq!(
            serde_json::to_value(&file).unwrap(),
            json!({
                "port": "file",
                "payload": { "name": "sample.json", "extension": ".json", "contents": "{}" }
            })
        );

        let cancelled = OutboundPort::FileError(FileError::cancelled());
        assert_eq!(
            serde_json::to_value(&cancelled).unwrap(),
            json!({
                "port": "fileError",
                "payload": { "kind": "dialogCancelled", "message": "no file selected" }
            })
        );
    }

    #[test]
    fn manifest_errors_are_wrapped() {
        let ok = OutboundPort::PackageJson(Ok(json!({ "name": "hotrod" })));
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({ "port": "packageJson", "payload": { "name": "hotrod" } })
        );

        let failed =
            OutboundPort::PackageJson(Err(FileError::parse(Path::new("package.json"), "eof")));
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["payload"]["error"]["kind"], "parse");
    }

    #[test]
    fn inbound_fetch_file_path_is_optional() {
        let bare: InboundPort = serde_json::from_str(r#"{"port":"fetchFile"}"#).unwrap();
        assert_eq!(bare, InboundPort::FetchFile { path: None });

        let direct: InboundPort =
            serde_json::from_str(r#"{"port":"fetchFile","path":"notes/a.txt"}"#).unwrap();
        assert_eq!(
            direct,
            InboundPort::FetchFile {
                path: Some(PathBuf::from("notes/a.txt"))
            }
        );
    }

    #[test]
    fn host_channel_names() {
        let request = serde_json::to_value(UiToHost::GetFile { request_id: 3 }).unwrap();
        assert_eq!(request, json!({ "channel": "get-file", "request_id": 3 }));

        let reply = serde_json::to_value(HostToUi::GetFileReply {
            request_id: 3,
            paths: vec![],
        })
        .unwrap();
        assert_eq!(reply["channel"], "get-file-reply");
    }
}
