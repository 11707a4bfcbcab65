use crate::error::UpdateError;
use std::path::PathBuf;

pub const SOURCE_FLAG: &str = "--update-source-path";
pub const DEST_FLAG: &str = "--update-dest-path";
pub const FROM_FLAG: &str = "--update-from";

/// A validated update invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    /// Staged update file, known to exist when the request was built.
    pub source_path: PathBuf,
    /// Installed executable that gets replaced and relaunched.
    pub destination_path: PathBuf,
    /// Version being upgraded from, forwarded to the relaunched application.
    pub from_version: Option<String>,
}

/// Parse and validate the invocation arguments (program name excluded).
///
/// Each recognized flag takes the next token as its value, whatever it looks
/// like. Unknown tokens are logged and skipped. Nothing outside of logging
/// happens here; the source file is only checked for existence.
pub fn parse_args<I, S>(args: I) -> Result<UpdateRequest, UpdateError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut source: Option<String> = None;
    let mut destination: Option<String> = None;
    let mut from_version: Option<String> = None;

    let mut tokens = args.into_iter().map(Into::into);
    while let Some(token) = tokens.next() {
        let (flag, slot) = match token.as_str() {
            SOURCE_FLAG => (SOURCE_FLAG, &mut source),
            DEST_FLAG => (DEST_FLAG, &mut destination),
            FROM_FLAG => (FROM_FLAG, &mut from_version),
            _ => {
                log::info!("Ignoring unrecognized argument: {token}");
                continue;
            }
        };

        let value = tokens
            .next()
            .ok_or(UpdateError::MissingArgumentValue { flag })?;
        match flag {
            SOURCE_FLAG => log::info!("Update source: {value}"),
            DEST_FLAG => log::info!("Update destination: {value}"),
            _ => log::info!("Updating from {value}"),
        }
        *slot = Some(value);
    }

    let source_path = require(source, SOURCE_FLAG)?;
    let destination_path = require(destination, DEST_FLAG)?;

    if !source_path.is_file() {
        return Err(UpdateError::SourceNotFound { path: source_path });
    }

    Ok(UpdateRequest {
        source_path,
        destination_path,
        from_version,
    })
}

fn require(value: Option<String>, flag: &'static str) -> Result<PathBuf, UpdateError> {
    match value {
        Some(v) if !v.is_empty() => Ok(PathBuf::from(v)),
        _ => Err(UpdateError::MissingRequiredArgument { flag }),
    }
}
