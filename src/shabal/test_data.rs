// Known answers for Shabal-256 and Shabal-512.

pub(crate) const MSG_B: &[u8] =
    b"abcdefghijklmnopqrstuvwxyz-0123456789-ABCDEFGHIJKLMNOPQRSTUVWXYZ-0123456789-abcdefghijklmnopqrstuvwxyz";

pub(crate) const SHABAL256_VECTORS: &[(&[u8], &str)] = &[
    (b"", "aec750d11feee9f16271922fbaf5a9be142f62019ef8d720f858940070889014"),
    (&[0u8], "135f547ab08ae0e0f0666a3f1ed789f70b5d683f3bfcaaaa12ff910ea7b9f7fb"),
    (b"abc", "07225fab83ca48fb480d22219410d5ca008359efbfd315829029afe2cb3f0404"),
    (&[0u8; 64], "da8f08c02a67ba9a56bdd0798e48ae0714215e093b5b850649a37718993f54a2"),
    (MSG_B, "b49f34bf51864c30533cc46cc2542bdec2f96fd06f5c539aff6ead5883f7327a"),
];

pub(crate) const SHABAL512_VECTORS: &[(&[u8], &str)] = &[
    (
        b"",
        "fc2d5dff5d70b7f6b1f8c2fcc8c1f9fe9934e54257eded0cf2b539a2ef0a19cc\
         ffa84f8d9fa135e4bd3c09f590f3a927ebd603ac29eb729e6f2a9af031ad8dc6",
    ),
    (
        &[0u8],
        "8703886b4251eccd6861da6ef21b4c9aa5a00793475056e05473c839ec8c7441\
         a645d6b4eb4a876b12d3fa84963283d46de289c599801bd46b29daee6642f2b1",
    ),
    (
        b"abc",
        "4a7f0f707c1b0c1d12ddcfa8aa0f9d2410dd9bab57c2d56705fc1acb02066f99\
         678738cedb20a2aba94842a441e77bc02656fe5690f98b421d029bfc4df09f91",
    ),
    (
        &[0u8; 64],
        "158016c6c81f3f0a52d98d68ed2f9e8e7895ef23cba7e2bc6109d8a532e6c9e6\
         a6a501979fb837f04ec4c620e73179dc82abb52b32cdadb35650e29c985e3022",
    ),
    (
        MSG_B,
        "677e6f7f12d70af0b335662f59b56851f3653e66647d3386dfda0143254cc8a5\
         db3e2194068c6f71597d7b60984d22b47a1f60d91ca8dfcb175d65b97359cecf",
    ),
];
