//! Account list input
//!
//! List-file mode reads a headerless CSV of `name,handle` rows. A malformed
//! row is fatal for the whole run: no accounts can be trusted once the list
//! cannot be parsed.

use std::path::Path;

use crate::error::InputError;
use crate::types::Account;

/// Parse the account list at `path`.
pub fn read_account_list(path: &Path) -> Result<Vec<Account>, InputError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| InputError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let mut accounts = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row_number = (index + 1) as u64;
        let record = row.map_err(|source| InputError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let name = record.get(0).unwrap_or("").trim();
        let handle = match record.get(1) {
            Some(handle) => handle.trim(),
            None => {
                return Err(InputError::MalformedRow {
                    row: row_number,
                    reason: format!("expected 2 fields, found {}", record.len()),
                })
            }
        };
        if handle.is_empty() {
            return Err(InputError::MalformedRow {
                row: row_number,
                reason: "handle is empty".to_string(),
            });
        }

        accounts.push(if name.is_empty() {
            Account::new(handle)
        } else {
            Account::named(name, handle)
        });
    }

    if accounts.is_empty() {
        return Err(InputError::Empty(path.to_path_buf()));
    }
    Ok(accounts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_list(contents: &str) -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("handles.csv");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn parses_name_handle_rows() {
        let (_dir, path) = write_list("Alice Example,alice\nBob Example,bob\n");
        let accounts = read_account_list(&path).unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0], Account::named("Alice Example", "alice"));
        assert_eq!(accounts[1].handle, "bob");
    }

    #[test]
    fn blank_name_becomes_none() {
        let (_dir, path) = write_list(",carol\n");
        let accounts = read_account_list(&path).unwrap();
        assert_eq!(accounts[0], Account::new("carol"));
    }

    #[test]
    fn row_without_handle_is_fatal() {
        let (_dir, path) = write_list("Alice Example,alice\njust-one-field\n");
        let error = read_account_list(&path).unwrap_err();
        match error {
            InputError::MalformedRow { row, .. } => assert_eq!(row, 2),
            other => panic!("expected MalformedRow, got {other}"),
        }
    }

    #[test]
    fn empty_list_is_fatal() {
        let (_dir, path) = write_list("");
        assert!(matches!(
            read_account_list(&path),
            Err(InputError::Empty(_))
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let result = read_account_list(&dir.path().join("missing.csv"));
        assert!(matches!(result, Err(InputError::Read { .. })));
    }
}
