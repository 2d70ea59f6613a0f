//! Role-bucketed user directory
//!
//! Names live in exactly one of three ordered buckets. Name comparison is
//! case-insensitive everywhere; the stored spelling is whatever was written
//! last.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskline_core::Role;
use tracing::debug;

use crate::{write_json_atomic, StoreError};

/// Ordered user names per role
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleBuckets {
    pub admin: Vec<String>,
    pub lead: Vec<String>,
    pub assignee: Vec<String>,
}

impl RoleBuckets {
    pub fn bucket(&self, role: Role) -> &[String] {
        match role {
            Role::Admin => &self.admin,
            Role::Lead => &self.lead,
            Role::Assignee => &self.assignee,
        }
    }

    pub fn bucket_mut(&mut self, role: Role) -> &mut Vec<String> {
        match role {
            Role::Admin => &mut self.admin,
            Role::Lead => &mut self.lead,
            Role::Assignee => &mut self.assignee,
        }
    }

    /// First role (admin, lead, assignee) holding `name`
    pub fn role_of(&self, name: &str) -> Option<Role> {
        let needle = name.to_lowercase();
        Role::ALL
            .into_iter()
            .find(|role| self.bucket(*role).iter().any(|n| n.to_lowercase() == needle))
    }

    /// Drop `name` from every bucket, returning how many entries went
    pub fn remove_everywhere(&mut self, name: &str) -> usize {
        let needle = name.to_lowercase();
        let mut removed = 0;
        for role in Role::ALL {
            let bucket = self.bucket_mut(role);
            let before = bucket.len();
            bucket.retain(|n| n.to_lowercase() != needle);
            removed += before - bucket.len();
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.admin.len() + self.lead.len() + self.assignee.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build buckets from a loosely-shaped document; unknown keys and
    /// non-text entries are ignored
    fn from_value(data: &Value) -> Self {
        let mut out = Self::default();
        for role in Role::ALL {
            let names = data
                .get(role.as_str())
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(entry_name).collect())
                .unwrap_or_default();
            *out.bucket_mut(role) = names;
        }
        out
    }
}

fn entry_name(entry: &Value) -> Option<String> {
    let name = match entry {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!name.is_empty()).then_some(name)
}

fn sanitize_name(name: &str) -> Result<String, StoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Changes applied by [`UserDirectory::update`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserUpdate {
    /// Move to this role (stays in its current role otherwise)
    pub role: Option<Role>,
    /// Rename; blank values keep the current name
    pub new_name: Option<String>,
    /// Position in the target bucket, clamped to its length; appended otherwise
    pub index: Option<usize>,
}

/// User directory backed by a JSON file of role buckets
#[derive(Clone, Debug)]
pub struct UserDirectory {
    path: PathBuf,
}

impl UserDirectory {
    /// Open the directory, creating an empty file when none exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if !path.exists() {
            debug!(path = %path.display(), "creating empty user directory");
            write_json_atomic(&path, &RoleBuckets::default())?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> Result<RoleBuckets, StoreError> {
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(RoleBuckets::default());
        }
        let data: Value = serde_json::from_str(&content)?;
        Ok(RoleBuckets::from_value(&data))
    }

    fn save(&self, buckets: &RoleBuckets) -> Result<(), StoreError> {
        write_json_atomic(&self.path, buckets)
    }

    /// Add `name` to `role` (assignee by default), removing it from any other
    /// bucket first
    pub fn add(&self, name: &str, role: Option<Role>) -> Result<RoleBuckets, StoreError> {
        let name = sanitize_name(name)?;
        let role = role.unwrap_or(Role::Assignee);
        let mut buckets = self.list()?;
        buckets.remove_everywhere(&name);
        buckets.bucket_mut(role).push(name);
        self.save(&buckets)?;
        Ok(buckets)
    }

    /// Move, rename and/or reposition an existing user
    pub fn update(&self, current: &str, update: UserUpdate) -> Result<RoleBuckets, StoreError> {
        let current = sanitize_name(current)?;
        let mut buckets = self.list()?;
        let original = buckets.role_of(&current).ok_or_else(|| StoreError::NotFound {
            kind: "user",
            key: current.clone(),
        })?;

        let role = update.role.unwrap_or(original);
        let final_name = update
            .new_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map_or_else(|| current.clone(), str::to_string);

        buckets.remove_everywhere(&current);
        buckets.remove_everywhere(&final_name);

        let bucket = buckets.bucket_mut(role);
        let at = update.index.map_or(bucket.len(), |i| i.min(bucket.len()));
        bucket.insert(at, final_name);

        self.save(&buckets)?;
        Ok(buckets)
    }

    /// Reorder a role's bucket: listed names that belong to it come first in
    /// the given order, the rest keep their relative order after them
    pub fn reorder(&self, role: Role, names: &[String]) -> Result<RoleBuckets, StoreError> {
        let mut buckets = self.list()?;
        let bucket = buckets.bucket_mut(role);
        let belongs: HashSet<String> = bucket.iter().map(|n| n.to_lowercase()).collect();

        let mut seen = HashSet::new();
        let mut ordered = Vec::with_capacity(bucket.len());
        for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
            let key = name.to_lowercase();
            if belongs.contains(&key) && seen.insert(key) {
                ordered.push(name.to_string());
            }
        }
        for name in bucket.iter() {
            if !seen.contains(&name.to_lowercase()) {
                ordered.push(name.clone());
            }
        }
        *bucket = ordered;

        self.save(&buckets)?;
        Ok(buckets)
    }

    /// Remove a user from every role
    pub fn remove(&self, name: &str) -> Result<RoleBuckets, StoreError> {
        let name = sanitize_name(name)?;
        let mut buckets = self.list()?;
        if buckets.remove_everywhere(&name) == 0 {
            return Err(StoreError::NotFound {
                kind: "user",
                key: name,
            });
        }
        self.save(&buckets)?;
        Ok(buckets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn from_value_skips_junk() {
        let data = json!({
            "admin": ["  Root  ", "", null, 42],
            "lead": "not a list",
            "extra": ["x"]
        });
        let buckets = RoleBuckets::from_value(&data);
        assert_eq!(buckets.admin, names(&["Root", "42"]));
        assert!(buckets.lead.is_empty());
        assert!(buckets.assignee.is_empty());
    }

    #[test]
    fn role_of_is_case_insensitive() {
        let buckets = RoleBuckets {
            lead: names(&["Ann"]),
            ..RoleBuckets::default()
        };
        assert_eq!(buckets.role_of("ANN"), Some(Role::Lead));
        assert_eq!(buckets.role_of("Bo"), None);
    }

    #[test]
    fn remove_everywhere_counts() {
        let mut buckets = RoleBuckets {
            admin: names(&["ann"]),
            assignee: names(&["Ann", "Bo"]),
            ..RoleBuckets::default()
        };
        assert_eq!(buckets.remove_everywhere("ANN"), 2);
        assert_eq!(buckets.len(), 1);
    }

    #[test]
    fn blank_names_rejected() {
        assert!(matches!(sanitize_name("   "), Err(StoreError::InvalidName(_))));
        assert_eq!(sanitize_name(" Ann ").unwrap(), "Ann");
    }

    #[test]
    fn empty_file_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user.json");
        std::fs::write(&path, "").unwrap();
        let users = UserDirectory::open(&path).unwrap();
        assert!(users.list().unwrap().is_empty());
    }
}
