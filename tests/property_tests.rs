use hashdupe::duplicates::{build_index, DuplicateIndex, Report};
use hashdupe::scanner::{HashAlgorithm, Hasher};
use proptest::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn one_shot(algorithm: HashAlgorithm, data: &[u8]) -> String {
    let mut hasher = algorithm.hasher();
    hasher.update(data);
    hasher.finalize_hex()
}

fn algorithm() -> impl Strategy<Value = HashAlgorithm> {
    prop::sample::select(HashAlgorithm::ALL.to_vec())
}

proptest! {
    #[test]
    fn test_chunked_digest_equals_one_shot(
        data in prop::collection::vec(any::<u8>(), 0..4096),
        chunk_size in 1usize..600,
        algorithm in algorithm(),
    ) {
        let hasher = Hasher::new(algorithm).with_chunk_size(chunk_size);
        let (digest, len) = hasher.digest_reader(data.as_slice()).unwrap();

        prop_assert_eq!(len, data.len() as u64);
        prop_assert_eq!(digest, one_shot(algorithm, &data));
    }

    #[test]
    fn test_file_digest_is_deterministic(content in "\\PC*") {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.bin");
        fs::write(&path, content.as_bytes()).unwrap();

        let hasher = Hasher::new(HashAlgorithm::Sha256);
        let first = hasher.digest_file(&path).unwrap();
        let second = hasher.digest_file(&path).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.size, content.len() as u64);
        prop_assert_eq!(first.digest, one_shot(HashAlgorithm::Sha256, content.as_bytes()));
    }

    #[test]
    fn test_wasted_bytes_formula(
        groups in prop::collection::vec((1u64..10_000, 1usize..6), 0..12),
    ) {
        let mut index = DuplicateIndex::new();
        let mut expected = 0u64;
        for (g, (size, members)) in groups.iter().enumerate() {
            for m in 0..*members {
                index.insert(format!("{:08}", g), PathBuf::from(format!("/{}/{}", g, m)), *size);
            }
            expected += size * (*members as u64 - 1);
        }

        let report = Report::summarize(&index);
        prop_assert_eq!(report.wasted_bytes, expected);
        prop_assert_eq!(
            report.duplicate_sets,
            groups.iter().filter(|(_, n)| *n > 1).count()
        );
        prop_assert!(report.sets.iter().all(|s| s.files.len() > 1));
    }

    #[test]
    fn test_grouping_matches_content_equality(
        contents in prop::collection::vec(0u8..5, 1..16),
        algorithm in algorithm(),
    ) {
        let dir = TempDir::new().unwrap();
        let mut by_content: HashMap<u8, Vec<PathBuf>> = HashMap::new();
        for (i, c) in contents.iter().enumerate() {
            let path = dir.path().join(format!("f{:02}", i));
            fs::write(&path, vec![b'a' + *c; *c as usize * 3]).unwrap();
            by_content.entry(*c).or_default().push(path);
        }

        let (index, _) = build_index(dir.path(), algorithm.name()).unwrap();

        prop_assert_eq!(index.len(), by_content.len());
        prop_assert_eq!(index.total_files(), contents.len());
        for (_, group) in index.iter() {
            let c = *contents
                .iter()
                .find(|c| group.filenames[0] == by_content[*c][0])
                .unwrap();
            prop_assert_eq!(&group.filenames, &by_content[&c]);
        }
    }
}
