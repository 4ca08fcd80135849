//! # Duplicates Module
//!
//! Finds files that share a name, ignoring case, wherever they live in the tree.
//!
//! Two files called `IMG_0001.JPG` and `img_0001.jpg` in different folders
//! would collide once moved into the same date folder, so they are worth
//! reporting even though their contents may differ. Contents are never read.

use crate::core::scanner::FileDescriptor;
use serde::Serialize;
use std::collections::HashMap;

/// Two or more files with the same lowercased name
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup {
    /// The shared lowercased file name
    pub key: String,
    /// Members in the order they were scanned
    pub files: Vec<FileDescriptor>,
}

impl DuplicateGroup {
    /// Display name, taken from the first member
    pub fn name(&self) -> &str {
        self.files
            .first()
            .map(|f| f.file_name())
            .unwrap_or(self.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Groups descriptors by case-insensitive file name
pub struct DuplicateFinder;

impl DuplicateFinder {
    /// Return every group of two or more files sharing a lowercased name.
    ///
    /// Groups are ordered by where their first member appears in `files`;
    /// members keep their input order.
    ///
    /// Each file belongs to at most one group. Three copies of a name form a
    /// single group of three, never an extra overlapping pair, so membership
    /// does not depend on the order of `files`.
    pub fn find(files: &[FileDescriptor]) -> Vec<DuplicateGroup> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<DuplicateGroup> = Vec::new();

        for file in files {
            let key = file.file_name_lower();
            match index.get(key) {
                Some(&slot) => groups[slot].files.push(file.clone()),
                None => {
                    index.insert(key, groups.len());
                    groups.push(DuplicateGroup {
                        key: key.to_string(),
                        files: vec![file.clone()],
                    });
                }
            }
        }

        groups.retain(|group| group.len() >= 2);
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{base_time, descriptor};
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn files(paths: &[&str]) -> Vec<FileDescriptor> {
        paths.iter().map(|p| descriptor(p, base_time())).collect()
    }

    fn paths(group: &DuplicateGroup) -> Vec<PathBuf> {
        group.files.iter().map(|f| f.path().to_path_buf()).collect()
    }

    #[test]
    fn no_files_no_groups() {
        assert!(DuplicateFinder::find(&[]).is_empty());
    }

    #[test]
    fn singletons_are_omitted() {
        let input = files(&["/a/one.jpg", "/b/two.jpg", "/c/three.jpg"]);
        assert!(DuplicateFinder::find(&input).is_empty());
    }

    #[test]
    fn names_match_case_insensitively() {
        let input = files(&["/a/Photo.JPG", "/b/photo.jpg"]);
        let groups = DuplicateFinder::find(&input);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "photo.jpg");
        assert_eq!(groups[0].name(), "Photo.JPG");
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn extension_is_part_of_the_key() {
        let input = files(&["/a/photo.jpg", "/b/photo.png"]);
        assert!(DuplicateFinder::find(&input).is_empty());
    }

    #[test]
    fn three_way_duplicate_is_one_group() {
        let input = files(&["/a/x.jpg", "/b/x.jpg", "/c/x.jpg"]);
        let groups = DuplicateFinder::find(&input);

        assert_eq!(groups.len(), 1);
        assert_eq!(
            paths(&groups[0]),
            vec![
                PathBuf::from("/a/x.jpg"),
                PathBuf::from("/b/x.jpg"),
                PathBuf::from("/c/x.jpg")
            ]
        );
    }

    #[test]
    fn groups_follow_first_appearance() {
        let input = files(&[
            "/1/b.jpg",
            "/1/a.jpg",
            "/1/lonely.txt",
            "/2/a.jpg",
            "/2/b.jpg",
        ]);
        let groups = DuplicateFinder::find(&input);

        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["b.jpg", "a.jpg"]);
    }

    #[test]
    fn membership_does_not_depend_on_input_order() {
        let forward = files(&["/1/a.jpg", "/2/b.jpg", "/3/A.jpg", "/4/c.txt", "/5/B.JPG"]);
        let mut reversed = forward.clone();
        reversed.reverse();

        let as_sets = |groups: Vec<DuplicateGroup>| -> BTreeSet<BTreeSet<PathBuf>> {
            groups
                .iter()
                .map(|g| paths(g).into_iter().collect())
                .collect()
        };

        assert_eq!(
            as_sets(DuplicateFinder::find(&forward)),
            as_sets(DuplicateFinder::find(&reversed))
        );
    }
}
