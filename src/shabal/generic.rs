use super::{BLOCK_SIZE, Counter};

/// The A, B, C registers of one Shabal instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct State {
    pub a: [u32; 12],
    pub b: [u32; 16],
    pub c: [u32; 16],
}

#[inline(always)]
pub(crate) const fn decode(block: &[u8; BLOCK_SIZE]) -> [u32; 16] {
    let mut m = [0u32; 16];
    let mut i = 0;
    while i < 16 {
        m[i] = u32::from_le_bytes([block[4 * i], block[4 * i + 1], block[4 * i + 2], block[4 * i + 3]]);
        i += 1;
    }
    m
}

#[inline(always)]
const fn input_add(s: &mut State, m: &[u32; 16]) {
    let mut i = 0;
    while i < 16 {
        s.b[i] = s.b[i].wrapping_add(m[i]);
        i += 1;
    }
}

#[inline(always)]
const fn input_sub(s: &mut State, m: &[u32; 16]) {
    let mut i = 0;
    while i < 16 {
        s.c[i] = s.c[i].wrapping_sub(m[i]);
        i += 1;
    }
}

#[inline(always)]
const fn xor_w(s: &mut State, (low, high): (u32, u32)) {
    s.a[0] ^= low;
    s.a[1] ^= high;
}

#[inline(always)]
const fn swap_bc(s: &mut State) {
    let t = s.b;
    s.b = s.c;
    s.c = t;
}

// The keyed permutation P: 3 rounds of 16 steps over A and B, keyed by C and M.
#[inline(always)]
pub(crate) const fn apply_p(s: &mut State, m: &[u32; 16]) {
    let mut i = 0;
    while i < 16 {
        s.b[i] = s.b[i].rotate_left(17);
        i += 1;
    }

    let mut k = 0;
    while k < 48 {
        let i = k % 16;
        let a0 = k % 12;
        let a1 = (k + 11) % 12;
        let t = s.a[a0] ^ s.a[a1].rotate_left(15).wrapping_mul(5) ^ s.c[(24 - i) % 16];
        s.a[a0] = t.wrapping_mul(3) ^ s.b[(i + 13) % 16] ^ (s.b[(i + 9) % 16] & !s.b[(i + 6) % 16]) ^ m[i];
        s.b[i] = !(s.b[i].rotate_left(1) ^ s.a[a0]);
        k += 1;
    }

    let mut j = 0;
    while j < 12 {
        s.a[j] = s.a[j]
            .wrapping_add(s.c[(j + 11) % 16])
            .wrapping_add(s.c[(j + 15) % 16])
            .wrapping_add(s.c[(j + 3) % 16]);
        j += 1;
    }
}

#[inline(always)]
pub(crate) const fn compress_block(s: &mut State, w: (u32, u32), m: &[u32; 16]) {
    input_add(s, m);
    xor_w(s, w);
    apply_p(s, m);
    input_sub(s, m);
    swap_bc(s);
}

// Finalization: the padded last block is permuted once, then three more
// times with B and C swapped, all under the same counter.
#[inline(always)]
pub(crate) const fn close_block(s: &mut State, w: (u32, u32), m: &[u32; 16]) {
    input_add(s, m);
    xor_w(s, w);
    apply_p(s, m);
    let mut i = 0;
    while i < 3 {
        swap_bc(s);
        xor_w(s, w);
        apply_p(s, m);
        i += 1;
    }
}

// compress as many blocks as possible of p. return the tail of p which did
// not compress.
#[inline]
pub(crate) fn compress_generic<'a>(s: &mut State, w: &mut Counter, p: &'a [u8]) -> &'a [u8] {
    let (chunks, tail) = p.as_chunks::<BLOCK_SIZE>();
    for chunk in chunks {
        compress_block(s, w.w(), &decode(chunk));
        w.incr();
    }
    tail
}

/// Derive the initial state for an `out_bits` digest by hashing the two
/// prefix blocks `[out_bits + i]` and `[out_bits + 16 + i]` from the zero
/// state, under counters -1 and 0.
pub(crate) const fn derive_iv(out_bits: u32) -> State {
    let mut s = State { a: [0; 12], b: [0; 16], c: [0; 16] };
    let mut m = [0u32; 16];
    let mut i = 0;
    while i < 16 {
        m[i] = out_bits + i as u32;
        i += 1;
    }
    compress_block(&mut s, (u32::MAX, u32::MAX), &m);
    let mut i = 0;
    while i < 16 {
        m[i] = out_bits + 16 + i as u32;
        i += 1;
    }
    compress_block(&mut s, (0, 0), &m);
    s
}
