use super::{Aligned16, AesRound, Kernel, Vector};

/// Portable reference backend: `N` lanes held in plain words, computed one
/// lane at a time. `N` must be 4, 8 or 16.
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lanes<const N: usize>(pub [u32; N]);

impl<const N: usize> Lanes<N> {
    #[inline(always)]
    fn map(self, f: impl Fn(u32) -> u32) -> Self {
        Self(self.0.map(f))
    }

    #[inline(always)]
    fn zip(self, b: Self, f: impl Fn(u32, u32) -> u32) -> Self {
        let mut r = self.0;
        for (x, y) in r.iter_mut().zip(b.0) {
            *x = f(*x, y);
        }
        Self(r)
    }

    // out[4g + i] = self[4g + idx[i]]
    #[inline(always)]
    fn shuffle(self, idx: [usize; 4]) -> Self {
        let mut r = [0u32; N];
        for (g, group) in self.0.chunks_exact(4).enumerate() {
            for (i, j) in idx.iter().enumerate() {
                r[4 * g + i] = group[*j];
            }
        }
        Self(r)
    }

    #[inline(always)]
    fn map_groups(self, b: Self, f: impl Fn([u8; 16], [u8; 16]) -> [u8; 16]) -> Self {
        let mut r = [0u32; N];
        for g in 0..N / 4 {
            let s = group_bytes(&self.0[4 * g..4 * g + 4]);
            let k = group_bytes(&b.0[4 * g..4 * g + 4]);
            let out = f(s, k);
            for (i, w) in out.chunks_exact(4).enumerate() {
                r[4 * g + i] = u32::from_le_bytes([w[0], w[1], w[2], w[3]]);
            }
        }
        Self(r)
    }
}

impl<const N: usize> Vector for Lanes<N> {
    const LANES: usize = {
        assert!(N == 4 || N == 8 || N == 16, "Lanes<N> supports 4, 8 or 16 lanes");
        N
    };
    const NAME: &'static str = "portable";

    type Words = Aligned16<u32, N>;

    #[inline(always)]
    fn available() -> bool {
        Self::LANES == N
    }

    #[inline(always)]
    unsafe fn dispatch<K: Kernel<Self>>(k: K) -> K::Output {
        k.run()
    }

    #[inline(always)]
    unsafe fn zero() -> Self {
        Self([0; N])
    }

    #[inline(always)]
    unsafe fn splat(x: u32) -> Self {
        Self([x; N])
    }

    #[inline(always)]
    unsafe fn load(src: &Self::Words) -> Self {
        Self(src.0)
    }

    #[inline(always)]
    fn store(self, dst: &mut Self::Words) {
        dst.0 = self.0;
    }

    #[inline(always)]
    fn add32(self, b: Self) -> Self {
        self.zip(b, u32::wrapping_add)
    }

    #[inline(always)]
    fn sub32(self, b: Self) -> Self {
        self.zip(b, u32::wrapping_sub)
    }

    #[inline(always)]
    fn mullo32(self, b: Self) -> Self {
        self.zip(b, u32::wrapping_mul)
    }

    #[inline(always)]
    fn and(self, b: Self) -> Self {
        self.zip(b, |x, y| x & y)
    }

    #[inline(always)]
    fn or(self, b: Self) -> Self {
        self.zip(b, |x, y| x | y)
    }

    #[inline(always)]
    fn xor(self, b: Self) -> Self {
        self.zip(b, |x, y| x ^ y)
    }

    #[inline(always)]
    fn andnot(self, b: Self) -> Self {
        self.zip(b, |x, y| !x & y)
    }

    #[inline(always)]
    fn shl32<const S: i32>(self) -> Self {
        self.map(|x| x << S)
    }

    #[inline(always)]
    fn shr32<const S: i32>(self) -> Self {
        self.map(|x| x >> S)
    }

    #[inline(always)]
    fn rol32<const S: i32>(self) -> Self {
        self.map(|x| x.rotate_left(S as u32))
    }

    #[inline(always)]
    fn ror32<const S: i32>(self) -> Self {
        self.map(|x| x.rotate_right(S as u32))
    }

    #[inline(always)]
    fn cmpeq32(self, b: Self) -> Self {
        self.zip(b, |x, y| if x == y { u32::MAX } else { 0 })
    }

    #[inline(always)]
    fn cmpgt32(self, b: Self) -> Self {
        self.zip(b, |x, y| if (x as i32) > (y as i32) { u32::MAX } else { 0 })
    }

    #[inline(always)]
    fn shuflr32(self) -> Self {
        self.shuffle([1, 2, 3, 0])
    }

    #[inline(always)]
    fn shufll32(self) -> Self {
        self.shuffle([3, 0, 1, 2])
    }

    #[inline(always)]
    fn rev32(self) -> Self {
        self.shuffle([3, 2, 1, 0])
    }

    #[inline(always)]
    fn swap64(self) -> Self {
        self.shuffle([2, 3, 0, 1])
    }

    #[inline(always)]
    fn swap64_32(self) -> Self {
        self.shuffle([1, 0, 3, 2])
    }

    #[inline(always)]
    fn bswap32(self) -> Self {
        self.map(u32::swap_bytes)
    }
}

impl<const N: usize> AesRound for Lanes<N> {
    fn aes_available() -> bool {
        true
    }

    unsafe fn aesenc(self, key: Self) -> Self {
        self.map_groups(key, |s, k| xor16(mix_columns(sub_bytes(shift_rows(s), &SBOX)), k))
    }

    unsafe fn aesenclast(self, key: Self) -> Self {
        self.map_groups(key, |s, k| xor16(sub_bytes(shift_rows(s), &SBOX), k))
    }

    unsafe fn aesdec(self, key: Self) -> Self {
        self.map_groups(key, |s, k| xor16(inv_mix_columns(sub_bytes(inv_shift_rows(s), &INV_SBOX)), k))
    }

    unsafe fn aesdeclast(self, key: Self) -> Self {
        self.map_groups(key, |s, k| xor16(sub_bytes(inv_shift_rows(s), &INV_SBOX), k))
    }
}

// State byte (row r, column c) lives at index r + 4c.
fn group_bytes(w: &[u32]) -> [u8; 16] {
    let mut b = [0u8; 16];
    for (i, x) in w.iter().enumerate() {
        b[4 * i..4 * i + 4].copy_from_slice(&x.to_le_bytes());
    }
    b
}

fn xor16(a: [u8; 16], b: [u8; 16]) -> [u8; 16] {
    let mut r = a;
    for (x, y) in r.iter_mut().zip(b) {
        *x ^= y;
    }
    r
}

fn shift_rows(s: [u8; 16]) -> [u8; 16] {
    core::array::from_fn(|i| {
        let (r, c) = (i % 4, i / 4);
        s[r + 4 * ((c + r) % 4)]
    })
}

fn inv_shift_rows(s: [u8; 16]) -> [u8; 16] {
    core::array::from_fn(|i| {
        let (r, c) = (i % 4, i / 4);
        s[r + 4 * ((c + 4 - r) % 4)]
    })
}

fn sub_bytes(s: [u8; 16], table: &[u8; 256]) -> [u8; 16] {
    s.map(|x| table[x as usize])
}

const fn xtime(a: u8) -> u8 {
    (a << 1) ^ (((a >> 7) & 1) * 0x1b)
}

const fn gmul(a: u8, b: u8) -> u8 {
    let mut a = a;
    let mut b = b;
    let mut r = 0;
    while b != 0 {
        if b & 1 != 0 {
            r ^= a;
        }
        a = xtime(a);
        b >>= 1;
    }
    r
}

fn mix_column_with(s: [u8; 16], m: [u8; 4]) -> [u8; 16] {
    let mut r = [0u8; 16];
    for c in 0..4 {
        let col = &s[4 * c..4 * c + 4];
        for row in 0..4 {
            let mut x = 0;
            for k in 0..4 {
                x ^= gmul(col[k], m[(k + 4 - row) % 4]);
            }
            r[4 * c + row] = x;
        }
    }
    r
}

fn mix_columns(s: [u8; 16]) -> [u8; 16] {
    mix_column_with(s, [2, 3, 1, 1])
}

fn inv_mix_columns(s: [u8; 16]) -> [u8; 16] {
    mix_column_with(s, [14, 11, 13, 9])
}

const fn gen_sbox() -> ([u8; 256], [u8; 256]) {
    let mut sbox = [0u8; 256];
    let mut inv = [0u8; 256];
    // walk the multiplicative group with generator 3 and its inverse 0xf6.
    let mut p: u8 = 1;
    let mut q: u8 = 1;
    loop {
        p = p ^ xtime(p);
        q ^= q << 1;
        q ^= q << 2;
        q ^= q << 4;
        if q & 0x80 != 0 {
            q ^= 0x09;
        }
        let x = q ^ q.rotate_left(1) ^ q.rotate_left(2) ^ q.rotate_left(3) ^ q.rotate_left(4) ^ 0x63;
        sbox[p as usize] = x;
        inv[x as usize] = p;
        if p == 1 {
            break;
        }
    }
    sbox[0] = 0x63;
    inv[0x63] = 0;
    (sbox, inv)
}

const TABLES: ([u8; 256], [u8; 256]) = gen_sbox();
static SBOX: [u8; 256] = TABLES.0;
static INV_SBOX: [u8; 256] = TABLES.1;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::check;

    #[test]
    fn test_lanes_ops() {
        check::all::<Lanes<4>>();
        check::all::<Lanes<8>>();
        check::all::<Lanes<16>>();
    }

    #[test]
    fn test_lanes_aes() {
        check::aes::<Lanes<4>>();
        check::aes::<Lanes<8>>();
        check::aes::<Lanes<16>>();
    }

    #[test]
    fn test_sbox() {
        assert_eq!(SBOX[0x00], 0x63);
        assert_eq!(SBOX[0x01], 0x7c);
        assert_eq!(SBOX[0x53], 0xed);
        assert_eq!(SBOX[0xff], 0x16);
        for x in 0..=255u8 {
            assert_eq!(INV_SBOX[SBOX[x as usize] as usize], x);
        }
    }

    #[test]
    fn test_mix_columns_inverse() {
        let s: [u8; 16] = core::array::from_fn(|i| (i * 17 + 3) as u8);
        assert_eq!(inv_mix_columns(mix_columns(s)), s);
        assert_eq!(inv_shift_rows(shift_rows(s)), s);
        // FIPS-197 mix column example db 13 53 45 -> 8e 4d a1 bc.
        let mut col = [0u8; 16];
        col[..4].copy_from_slice(&[0xdb, 0x13, 0x53, 0x45]);
        assert_eq!(&mix_columns(col)[..4], &[0x8e, 0x4d, 0xa1, 0xbc]);
    }
}
