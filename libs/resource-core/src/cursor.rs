//! Opaque cursor token codec.
//!
//! Serialized values are joined with a private delimiter and base64-encoded
//! with the standard alphabet; padding is stripped on the wire and tolerated
//! on decode. Callers JSON-serialize values before encoding, so non-string
//! scalars survive the join unescaped.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;

use crate::error::Error;

/// Separator between serialized values inside a token, chosen unlikely to
/// collide with JSON scalar output.
pub(crate) const DELIMITER: &str = "$$";

pub fn encode(values: &[String]) -> String {
    STANDARD_NO_PAD.encode(values.join(DELIMITER))
}

pub fn decode(token: &str) -> Result<Vec<String>, Error> {
    let bytes = STANDARD_NO_PAD
        .decode(token.trim_end_matches('='))
        .map_err(|_| Error::CursorInvalidToken)?;
    let joined = String::from_utf8(bytes).map_err(|_| Error::CursorInvalidToken)?;
    Ok(joined.split(DELIMITER).map(str::to_owned).collect())
}
