use crate::core::FileTask;
use crate::utils::ConfigError;

/// An ordered slice of the batch, at most `group_size` files long.
pub type BatchGroup = Vec<FileTask>;

/// Splits `files` into consecutive groups of `group_size`.
///
/// Group `i` holds files `[i * group_size, (i + 1) * group_size)`; only the
/// last group may be shorter.
pub fn partition(files: Vec<FileTask>, group_size: usize) -> Result<Vec<BatchGroup>, ConfigError> {
    if group_size == 0 {
        return Err(ConfigError::InvalidGroupSize(group_size));
    }
    Ok(files
        .chunks(group_size)
        .map(|chunk| chunk.to_vec())
        .collect())
}
