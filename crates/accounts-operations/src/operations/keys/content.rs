use accounts_core::Key;

use crate::Result;
use crate::error::OperationError;

/// `key` with its content trimmed, or an error if nothing usable is left.
///
/// Every key line ends up in `authorized_keys`, so content that spans lines
/// is refused outright.
pub(crate) fn checked_key(key: Key) -> Result<Key> {
    let key = key.trimmed();
    if key.content.is_empty() {
        return Err(OperationError::EmptyKeyContent);
    }
    if key.is_multi_line() {
        return Err(OperationError::MultiLineKeyContent);
    }
    Ok(key)
}
