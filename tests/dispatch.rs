//! Batch hashing through the runtime dispatcher.

use shabal_simd::{Backend, Dispatcher, Error, Shabal256, Shabal512, dispatch};

fn scalar256(msg: &[u8]) -> [u8; 32] {
    let mut h = Shabal256::new();
    h.write(msg);
    h.sum()
}

fn scalar512(msg: &[u8]) -> [u8; 64] {
    let mut h = Shabal512::new();
    h.write(msg);
    h.sum()
}

fn available() -> impl Iterator<Item = Dispatcher> {
    Backend::ALL.into_iter().filter_map(|b| Dispatcher::with_backend(b).ok())
}

#[test]
fn batch_matches_sequential() {
    let msgs: Vec<Vec<u8>> = (0..40).map(|i| format!("test input {i:02}").into_bytes()).collect();
    let inputs: Vec<&[u8]> = msgs.iter().map(|m| m.as_slice()).collect();

    for d in available() {
        let d256 = d.shabal256_batch(&inputs);
        let d512 = d.shabal512_batch(&inputs);
        for (i, m) in inputs.iter().enumerate() {
            assert_eq!(d256[i], scalar256(m), "{} input {i}", d.backend());
            assert_eq!(d512[i], scalar512(m), "{} input {i}", d.backend());
        }
    }
}

#[test]
fn batch_with_different_lengths() {
    let long = vec![7u8; 1000];
    let inputs: &[&[u8]] = &[b"", b"a", b"short", b"a", &long, b"", b"a", b"a", b"a medium length string for testing"];
    for d in available() {
        let batch = d.shabal256_batch(inputs);
        assert_eq!(batch.len(), inputs.len());
        for (i, input) in inputs.iter().enumerate() {
            assert_eq!(batch[i], scalar256(input), "{} mismatch at index {i}", d.backend());
        }
    }
}

#[test]
fn batch_empty_returns_empty() {
    let empty: &[&[u8]] = &[];
    assert!(dispatch::global().shabal512_batch(empty).is_empty());
}

#[test]
fn global_is_detected_backend() {
    let d = dispatch::global();
    assert_eq!(d.backend(), Dispatcher::detect().backend());
    assert!(d.backend().available());
    assert_eq!(d.lanes(), d.backend().lanes());
}

#[test]
fn unsupported_backend() {
    for b in Backend::ALL.into_iter().filter(|b| !b.available()) {
        assert_eq!(Dispatcher::with_backend(b), Err(Error::Unsupported(b)));
        assert_eq!(
            Error::Unsupported(b).to_string(),
            format!("backend {} is not supported on this cpu", b.name())
        );
    }
}
