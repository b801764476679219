//! Known answers for every lane of every backend the host supports.

use hex_literal::hex;
use shabal_simd::simd::{Lanes, Vector};
use shabal_simd::{Shabal256, Shabal512, ShabalX};

const MSG_B: &[u8] =
    b"abcdefghijklmnopqrstuvwxyz-0123456789-ABCDEFGHIJKLMNOPQRSTUVWXYZ-0123456789-abcdefghijklmnopqrstuvwxyz";

const VECTORS_256: &[(&[u8], [u8; 32])] = &[
    (b"", hex!("aec750d11feee9f16271922fbaf5a9be142f62019ef8d720f858940070889014")),
    (&[0u8], hex!("135f547ab08ae0e0f0666a3f1ed789f70b5d683f3bfcaaaa12ff910ea7b9f7fb")),
    (b"abc", hex!("07225fab83ca48fb480d22219410d5ca008359efbfd315829029afe2cb3f0404")),
    (&[0u8; 64], hex!("da8f08c02a67ba9a56bdd0798e48ae0714215e093b5b850649a37718993f54a2")),
    (MSG_B, hex!("b49f34bf51864c30533cc46cc2542bdec2f96fd06f5c539aff6ead5883f7327a")),
];

const VECTORS_512: &[(&[u8], [u8; 64])] = &[
    (
        b"",
        hex!(
            "fc2d5dff5d70b7f6b1f8c2fcc8c1f9fe9934e54257eded0cf2b539a2ef0a19cc"
            "ffa84f8d9fa135e4bd3c09f590f3a927ebd603ac29eb729e6f2a9af031ad8dc6"
        ),
    ),
    (
        &[0u8],
        hex!(
            "8703886b4251eccd6861da6ef21b4c9aa5a00793475056e05473c839ec8c7441"
            "a645d6b4eb4a876b12d3fa84963283d46de289c599801bd46b29daee6642f2b1"
        ),
    ),
    (
        b"abc",
        hex!(
            "4a7f0f707c1b0c1d12ddcfa8aa0f9d2410dd9bab57c2d56705fc1acb02066f99"
            "678738cedb20a2aba94842a441e77bc02656fe5690f98b421d029bfc4df09f91"
        ),
    ),
    (
        &[0u8; 64],
        hex!(
            "158016c6c81f3f0a52d98d68ed2f9e8e7895ef23cba7e2bc6109d8a532e6c9e6"
            "a6a501979fb837f04ec4c620e73179dc82abb52b32cdadb35650e29c985e3022"
        ),
    ),
    (
        MSG_B,
        hex!(
            "677e6f7f12d70af0b335662f59b56851f3653e66647d3386dfda0143254cc8a5"
            "db3e2194068c6f71597d7b60984d22b47a1f60d91ca8dfcb175d65b97359cecf"
        ),
    ),
];

fn every_lane<V: Vector, const D: usize>(vectors: &[(&[u8], [u8; D])]) {
    if !V::available() {
        return;
    }
    for (msg, expect) in vectors {
        let mut s = ShabalX::<V, D>::new().unwrap();
        s.update(&vec![*msg; V::LANES]).unwrap();
        let mut out = vec![0u8; D * V::LANES];
        s.close(&mut out).unwrap();
        for (l, digest) in out.chunks_exact(D).enumerate() {
            assert_eq!(digest, expect, "{} x{} lane {l} msg len {}", V::NAME, V::LANES, msg.len());
        }
    }
}

fn backend<V: Vector>() {
    every_lane::<V, 32>(VECTORS_256);
    every_lane::<V, 64>(VECTORS_512);
}

#[test]
fn scalar_vectors() {
    for (msg, expect) in VECTORS_256 {
        let mut h = Shabal256::new();
        h.write(msg);
        assert_eq!(h.sum(), *expect);
    }
    for (msg, expect) in VECTORS_512 {
        let mut h = Shabal512::new();
        h.write(msg);
        assert_eq!(h.sum(), *expect);
    }
}

#[test]
fn portable_vectors() {
    backend::<Lanes<4>>();
    backend::<Lanes<8>>();
    backend::<Lanes<16>>();
}

#[cfg(target_arch = "x86_64")]
#[test]
fn amd64_vectors() {
    use shabal_simd::simd::amd64::{V128, V256, V512};
    backend::<V128>();
    backend::<V256>();
    backend::<V512>();
}

#[cfg(target_arch = "aarch64")]
#[test]
fn neon_vectors() {
    backend::<shabal_simd::simd::aarch64::V128>();
}

#[test]
fn native_aliases() {
    let mut out = [0u8; 32 * 16];
    if let Ok(mut s) = shabal_simd::Shabal256x16::new() {
        s.update(&[&b"abc"[..]; 16]).unwrap();
        s.close(&mut out).unwrap();
        assert_eq!(out[15 * 32..], VECTORS_256[2].1);
    }
    if let Ok(mut s) = shabal_simd::Shabal512x4::new() {
        s.close(&mut out[..256]).unwrap();
        assert_eq!(out[192..256], VECTORS_512[0].1);
    }
}

// the digest of the 1000-byte 0, 1, ..., 250, 0, ... message.
#[test]
fn long_message_every_lane() {
    let msg: Vec<u8> = (0..1000).map(|i| (i % 251) as u8).collect();
    every_lane::<Lanes<8>, 32>(&[(
        msg.as_slice(),
        hex!("599d42fba1cf6c350256759cf63ce734d2cdf1499997d9d384193c2ec2595ea4"),
    )]);
    every_lane::<Lanes<4>, 64>(&[(
        msg.as_slice(),
        hex!(
            "63c93dcd692f9de6583e6ba2b43b61832132d340921ffff00031e30408b59b75"
            "4f2b4e223e5310196c3a00503720a34eae5e0252938a7d732a1680f3bb9d1624"
        ),
    )]);
}

#[test]
fn extra_bits_every_lane() {
    let mut s = shabal_simd::shabal_simd::Shabal256x4p::new().unwrap();
    s.update(&[&b"abc"[..]; 4]).unwrap();
    let mut out = [0u8; 128];
    s.addbits_and_close(0xa0, 3, &mut out).unwrap();
    for digest in out.chunks_exact(32) {
        assert_eq!(digest, hex!("501f43495e5168444e16e7433cf4125b36a48e0fc3aa20a35f87a4f2ff6e5387"));
    }

    let mut s = shabal_simd::shabal_simd::Shabal512x8p::new().unwrap();
    s.update(&[&[0u8; 63][..]; 8]).unwrap();
    let mut out = [0u8; 512];
    s.addbits_and_close(0xfe, 7, &mut out).unwrap();
    for digest in out.chunks_exact(64) {
        assert_eq!(
            digest,
            hex!(
                "f88f60b14e24d9e6793ae0ff9bc7d5a98c43318eca3cf2aff42fe3090a37a9c9"
                "2555ee440e9793a2afbf70f50c16977c0c7fd4056d20ec1be0ed52312a033f47"
            )
        );
    }
}
