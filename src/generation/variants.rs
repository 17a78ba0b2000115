//! Variant matrix: one dummy app per (postfix, backend) combination

use std::path::{Component, Path, PathBuf};

use crate::core::config::is_active_record;

/// One concrete (postfix, backend) combination requiring its own dummy app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// Configuration postfix, empty for the unqualified variant
    pub postfix: String,
    pub backend: String,
    /// Dummy app location relative to the engine root
    pub relative_path: PathBuf,
}

impl Variant {
    pub fn new(postfix: &str, backend: &str, test_path: &str) -> Self {
        Self {
            postfix: postfix.to_string(),
            backend: backend.to_string(),
            relative_path: dummy_path(test_path, backend, postfix),
        }
    }

    /// Absolute dummy app location under the engine root
    pub fn app_path(&self, root: &Path) -> PathBuf {
        root.join(&self.relative_path)
    }

    /// True when the app path only descends below the root it is joined to
    pub fn is_confined(&self) -> bool {
        self.relative_path
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
    }

    pub fn is_active_record(&self) -> bool {
        is_active_record(&self.backend)
    }

    /// Human readable variant name used in step labels
    pub fn display_name(&self) -> String {
        if self.postfix.is_empty() {
            self.backend.clone()
        } else {
            format!("{} ({})", self.backend, self.postfix)
        }
    }
}

/// `{test_path}/dummy-apps/dummy-{backend}[-{postfix}]`
pub fn dummy_path(test_path: &str, backend: &str, postfix: &str) -> PathBuf {
    let dir = if postfix.is_empty() {
        format!("dummy-{backend}")
    } else {
        format!("dummy-{backend}-{postfix}")
    };
    Path::new(test_path).join("dummy-apps").join(dir)
}

/// Cross product of postfixes and backends, outer loop over postfixes.
///
/// An empty postfix list behaves like a single empty postfix. Order follows the
/// input lists and nothing is deduplicated.
pub fn variant_matrix(postfixes: &[String], backends: &[String], test_path: &str) -> Vec<Variant> {
    let implicit = [String::new()];
    let postfixes = if postfixes.is_empty() {
        &implicit[..]
    } else {
        postfixes
    };

    postfixes
        .iter()
        .flat_map(|postfix| {
            backends
                .iter()
                .map(move |backend| Variant::new(postfix, backend, test_path))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_empty_postfixes_yield_one_variant_per_backend() {
        let variants = variant_matrix(&[], &strings(&["active_record", "mongoid"]), "test");

        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].backend, "active_record");
        assert_eq!(variants[0].postfix, "");
        assert_eq!(
            variants[0].relative_path,
            PathBuf::from("test/dummy-apps/dummy-active_record")
        );
        assert_eq!(
            variants[1].relative_path,
            PathBuf::from("test/dummy-apps/dummy-mongoid")
        );
    }

    #[test]
    fn test_outer_postfix_inner_backend_order() {
        let postfixes = strings(&["devise", "authlogic"]);
        let backends = strings(&["active_record", "mongoid", "active_record"]);
        let variants = variant_matrix(&postfixes, &backends, "spec");

        assert_eq!(variants.len(), postfixes.len() * backends.len());
        let pairs: Vec<(&str, &str)> = variants
            .iter()
            .map(|v| (v.postfix.as_str(), v.backend.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("devise", "active_record"),
                ("devise", "mongoid"),
                ("devise", "active_record"),
                ("authlogic", "active_record"),
                ("authlogic", "mongoid"),
                ("authlogic", "active_record"),
            ]
        );
    }

    #[test]
    fn test_postfix_is_part_of_the_path() {
        let variants = variant_matrix(
            &strings(&["devise", "authlogic"]),
            &strings(&["mongoid"]),
            "spec",
        );

        assert_eq!(
            variants[0].relative_path,
            PathBuf::from("spec/dummy-apps/dummy-mongoid-devise")
        );
        assert_ne!(variants[0].relative_path, variants[1].relative_path);
        assert_eq!(variants[0].display_name(), "mongoid (devise)");
    }

    #[test]
    fn test_escaping_variant_is_not_confined() {
        assert!(Variant::new("devise", "mongoid", "spec").is_confined());
        assert!(!Variant::new("", "x/../../../../victim", "test").is_confined());
        assert!(!Variant::new("", "/etc", "test").is_confined());
    }

    #[test]
    fn test_app_path_is_rooted() {
        let variant = Variant::new("", "ar", "test");
        assert!(variant.is_active_record());
        assert_eq!(
            variant.app_path(Path::new("/engines/blog")),
            PathBuf::from("/engines/blog/test/dummy-apps/dummy-ar")
        );
    }
}
