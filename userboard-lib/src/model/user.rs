//! User record type

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

/// A single user entry from the member directory.
///
/// Records are immutable as delivered by the data source; the only mutation
/// path is an explicit edit-commit through
/// [`UserBoard::commit_edit`](crate::board::UserBoard::commit_edit).
///
/// # Example
///
/// ```
/// use userboard_lib::model::UserRecord;
///
/// let user = UserRecord::new(1, "Alice", "a@x.com", "admin");
/// assert_eq!(user.id, 1);
/// assert_eq!(user.role, "admin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique, stable, source-assigned identifier.
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Role name, e.g. `admin` or `member`. Free text as far as the model
    /// is concerned.
    pub role: String,
}

impl UserRecord {
    /// Creates a new record with the given fields.
    pub fn new(
        id: u64,
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role: role.into(),
        }
    }
}

/// The production endpoint serves `id` as a JSON string ("1"); accept both
/// representations.
fn id_from_number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Number(u64),
        Text(String),
    }

    match IdRepr::deserialize(deserializer)? {
        IdRepr::Number(id) => Ok(id),
        IdRepr::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}
