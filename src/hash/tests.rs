use super::*;

const NIL_HASH: &str = "4bf5122f344554c53bde2ebb8cd2b7e3d1600ad631c385a5d7cce23c7785459a";
const ONE_HASH: &str = "9dcf97a184f32623d11a73124ceb99a5709b083721e878a16d78f596718ba7b2";
const PAIR_ONE_NIL_HASH: &str = "ba4484b961b7a2369d948d06c55b64bdbfaffb326bc13b490ab1215dd33d8d46";

#[test]
fn test_clvm_tree_hash_vectors() {
    assert_eq!(tree_hash(&Tree::nil()).to_hex(), NIL_HASH);
    assert_eq!(tree_hash(&Tree::int(1)).to_hex(), ONE_HASH);
    assert_eq!(
        tree_hash(&Tree::pair(Tree::int(1), Tree::nil())).to_hex(),
        PAIR_ONE_NIL_HASH
    );
}

#[test]
fn test_structurally_equal_trees_match() {
    let a = Tree::list([Tree::atom(b"abc"), Tree::int(7)]);
    let b = Tree::list([Tree::atom(b"abc"), Tree::int(7)]);
    assert_eq!(tree_hash(&a), tree_hash(&b));
    assert_eq!(
        HashAlgorithm::Blake3.tree_hash(&a),
        HashAlgorithm::Blake3.tree_hash(&b)
    );
}

#[test]
fn test_atom_and_pair_do_not_collide() {
    // The pair preimage of (() . ()) must not equal any atom preimage.
    let pair = Tree::pair(Tree::nil(), Tree::nil());
    let nil = tree_hash(&Tree::nil());
    let mut flat = vec![0x02];
    flat.extend_from_slice(&nil.0);
    flat.extend_from_slice(&nil.0);
    assert_ne!(tree_hash(&pair), tree_hash(&Tree::atom(&flat)));
}

#[test]
fn test_algorithms_differ() {
    let tree = Tree::atom(b"module");
    assert_ne!(
        HashAlgorithm::Sha256.tree_hash(&tree),
        HashAlgorithm::Blake3.tree_hash(&tree)
    );
    assert_eq!(HashAlgorithm::default(), HashAlgorithm::Sha256);
    assert_eq!(HashAlgorithm::Blake3.as_str(), "blake3");
}

#[test]
fn test_hex_roundtrip() {
    let fp = tree_hash(&Tree::int(1));
    assert_eq!(Fingerprint::from_hex(&fp.to_hex()), Some(fp));
    assert_eq!(Fingerprint::from_hex(&format!("0x{}", fp.to_hex())), Some(fp));
    assert_eq!(Fingerprint::from_hex(&ONE_HASH.to_uppercase()), Some(fp));
}

#[test]
fn test_from_hex_rejects_bad_input() {
    assert!(Fingerprint::from_hex("").is_none());
    assert!(Fingerprint::from_hex(&NIL_HASH[..62]).is_none());
    assert!(Fingerprint::from_hex(&format!("{}zz", &NIL_HASH[..62])).is_none());
}

#[test]
fn test_short_form() {
    assert_eq!(Fingerprint::zero().to_short(), "00000000");
    let fp = tree_hash(&Tree::nil());
    assert_eq!(fp.to_short().len(), 8);
    assert_eq!(format!("{}", fp), format!("#{}", fp.to_short()));
}

#[test]
fn test_serde_hex() {
    let fp = tree_hash(&Tree::nil());
    let json = serde_json::to_string(&fp).unwrap();
    assert_eq!(json, format!("\"{}\"", NIL_HASH));
    let back: Fingerprint = serde_json::from_str(&json).unwrap();
    assert_eq!(back, fp);
    assert!(serde_json::from_str::<Fingerprint>("\"abc\"").is_err());
}

#[test]
fn test_tree_hash_long_list_on_small_stack() {
    let handle = std::thread::Builder::new()
        .stack_size(256 * 1024)
        .spawn(|| {
            let list = Tree::list((0..200_000).map(Tree::int));
            let same = Tree::list((0..200_000).map(Tree::int));
            let fp = tree_hash(&list);
            assert_eq!(fp, tree_hash(&same));
            assert_ne!(fp, tree_hash(list.rest().unwrap()));
            assert_ne!(
                HashAlgorithm::Blake3.tree_hash(&list),
                HashAlgorithm::Sha256.tree_hash(&list)
            );
        })
        .unwrap();
    handle.join().unwrap();
}

#[test]
fn test_tree_hash_matches_nested_definition() {
    // ((1 . 2) . (3 . ())) hashed by hand from the per-node rule.
    let leaf = |t: &Tree| tree_hash(t).0;
    let pair = |a: [u8; 32], b: [u8; 32]| {
        let mut hasher = Sha256::new();
        hasher.update([PAIR_PREFIX]);
        hasher.update(a);
        hasher.update(b);
        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        out
    };
    let left = pair(leaf(&Tree::int(1)), leaf(&Tree::int(2)));
    let right = pair(leaf(&Tree::int(3)), leaf(&Tree::nil()));
    let tree = Tree::pair(
        Tree::pair(Tree::int(1), Tree::int(2)),
        Tree::list([Tree::int(3)]),
    );
    assert_eq!(tree_hash(&tree).0, pair(left, right));
}
