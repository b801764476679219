use super::ShabalX;
use crate::simd::{BLOCK_BYTES, BLOCK_WORDS, Kernel, Vector};

static ZERO_BLOCK: [u8; BLOCK_BYTES] = [0; BLOCK_BYTES];

#[inline(always)]
fn mul3<V: Vector>(x: V) -> V {
    x.shl32::<1>().add32(x)
}

#[inline(always)]
fn mul5<V: Vector>(x: V) -> V {
    x.shl32::<2>().add32(x)
}

// step k of the permutation, i = k mod 16:
// A[k%12] = 3 * (A[k%12] ^ 5 * rol15(A[(k+11)%12]) ^ C[(8-i)%16])
//           ^ B[i+13] ^ (B[i+9] & !B[i+6]) ^ M[i]
// B[i]    = !(rol1(B[i]) ^ A[k%12])
macro_rules! perm_elt {
    ($a: ident, $b: ident, $c: ident, $m: ident, $k: expr) => {{
        let i = ($k) % 16;
        let a0 = ($k) % 12;
        let a1 = (($k) + 11) % 12;
        let t = mul3($a[a0].xor3(mul5($a[a1].rol32::<15>()), $c[(24 - i) % 16]));
        $a[a0] = t.xor3($b[(i + 13) % 16], $m[i]).xorandnot($b[(i + 6) % 16], $b[(i + 9) % 16]);
        $b[i] = $b[i].rol32::<1>().xnor($a[a0]);
    }};
}

macro_rules! perm_4 {
    ($a: ident, $b: ident, $c: ident, $m: ident, $k: expr) => {
        perm_elt!($a, $b, $c, $m, $k);
        perm_elt!($a, $b, $c, $m, $k + 1);
        perm_elt!($a, $b, $c, $m, $k + 2);
        perm_elt!($a, $b, $c, $m, $k + 3);
    };
}

/// The keyed permutation: 48 steps over A and B, then C folded into A.
#[inline(always)]
pub(crate) fn apply_p<V: Vector>(a: &mut [V; 12], b: &mut [V; 16], c: &[V; 16], m: &[V; BLOCK_WORDS]) {
    for x in b.iter_mut() {
        *x = x.rol32::<17>();
    }

    perm_4!(a, b, c, m, 0);
    perm_4!(a, b, c, m, 4);
    perm_4!(a, b, c, m, 8);
    perm_4!(a, b, c, m, 12);
    perm_4!(a, b, c, m, 16);
    perm_4!(a, b, c, m, 20);
    perm_4!(a, b, c, m, 24);
    perm_4!(a, b, c, m, 28);
    perm_4!(a, b, c, m, 32);
    perm_4!(a, b, c, m, 36);
    perm_4!(a, b, c, m, 40);
    perm_4!(a, b, c, m, 44);

    for (j, x) in a.iter_mut().enumerate() {
        *x = x.add4_32(c[(j + 11) % 16], c[(j + 15) % 16], c[(j + 3) % 16]);
    }
}

impl<V: Vector, const DIGEST_SIZE: usize> ShabalX<V, DIGEST_SIZE> {
    #[inline(always)]
    fn input_add(&mut self, m: &[V; BLOCK_WORDS]) {
        for (x, y) in self.b.iter_mut().zip(m) {
            *x = x.add32(*y);
        }
    }

    #[inline(always)]
    fn input_sub(&mut self, m: &[V; BLOCK_WORDS]) {
        for (x, y) in self.c.iter_mut().zip(m) {
            *x = x.sub32(*y);
        }
    }

    #[inline(always)]
    fn xor_w(&mut self, (low, high): (u32, u32)) {
        self.a[0] = self.a[0].xor(self.splat(low));
        self.a[1] = self.a[1].xor(self.splat(high));
    }

    #[inline(always)]
    fn swap_bc(&mut self) {
        core::mem::swap(&mut self.b, &mut self.c);
    }

    #[inline(always)]
    fn permute(&mut self, m: &[V; BLOCK_WORDS]) {
        apply_p(&mut self.a, &mut self.b, &self.c, m);
    }

    /// Absorb one block of lane-packed words and advance the block counter.
    #[inline(always)]
    pub(super) fn compress(&mut self, m: &[V; BLOCK_WORDS]) {
        self.load_state();
        let w = self.w.w();
        self.input_add(m);
        self.xor_w(w);
        self.permute(m);
        self.input_sub(m);
        self.swap_bc();
        self.w.incr();
    }

    /// Absorb the padded final block, then run the three extra permutations
    /// with B and C swapped under the same counter value.
    #[inline(always)]
    pub(super) fn compress_final(&mut self, m: &[V; BLOCK_WORDS]) {
        self.load_state();
        let w = self.w.w();
        self.input_add(m);
        self.xor_w(w);
        self.permute(m);
        for _ in 0..3 {
            self.swap_bc();
            self.xor_w(w);
            self.permute(m);
        }
    }
}

/// Compress `blocks` whole blocks gathered straight from `lanes[l][off..]`.
pub(super) struct Absorb<'s, 'm, V: Vector, const D: usize> {
    pub(super) state: &'s mut ShabalX<V, D>,
    pub(super) lanes: &'m [&'m [u8]],
    pub(super) off: usize,
    pub(super) blocks: usize,
}

impl<V: Vector, const D: usize> Kernel<V> for Absorb<'_, '_, V, D> {
    type Output = ();

    #[inline(always)]
    fn run(self) {
        let mut blocks = [&ZERO_BLOCK; 16];
        for k in 0..self.blocks {
            let at = self.off + k * BLOCK_BYTES;
            for (blk, lane) in blocks.iter_mut().zip(self.lanes) {
                if let Some(chunk) = lane[at..].first_chunk() {
                    *blk = chunk;
                }
            }
            // Safety: the state exists, so `V` is available.
            let m = unsafe { V::load_block(&blocks[..V::LANES]) };
            self.state.compress(&m);
        }
    }
}

/// Compress the full buffer.
pub(super) struct Flush<'s, V: Vector, const D: usize>(pub(super) &'s mut ShabalX<V, D>);

impl<V: Vector, const D: usize> Kernel<V> for Flush<'_, V, D> {
    type Output = ();

    #[inline(always)]
    fn run(self) {
        let m = self.0.buf;
        self.0.compress(&m);
    }
}

/// Pad the buffered tail with `pad` and zeros, then run the final rounds.
pub(super) struct Finish<'s, V: Vector, const D: usize> {
    pub(super) state: &'s mut ShabalX<V, D>,
    pub(super) pad: u8,
}

impl<V: Vector, const D: usize> Kernel<V> for Finish<'_, V, D> {
    type Output = ();

    #[inline(always)]
    fn run(self) {
        let s = self.state;
        let at = s.ptr / 4;
        let shift = 8 * (s.ptr % 4) as u32;
        let keep = if shift == 0 { 0 } else { u32::MAX >> (32 - shift) };

        let mut m = s.buf;
        m[at] = m[at].and(s.splat(keep)).or(s.splat((self.pad as u32) << shift));
        for x in m[at + 1..].iter_mut() {
            *x = s.splat(0);
        }
        s.compress_final(&m);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::Lanes;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    // reference step loop, straight from the definition.
    fn apply_p_scalar(a: &mut [u32; 12], b: &mut [u32; 16], c: &[u32; 16], m: &[u32; 16]) {
        for x in b.iter_mut() {
            *x = x.rotate_left(17);
        }
        for k in 0..48 {
            let i = k % 16;
            let (a0, a1) = (k % 12, (k + 11) % 12);
            let t = (a[a0] ^ a[a1].rotate_left(15).wrapping_mul(5) ^ c[(8 + 16 - i) % 16]).wrapping_mul(3);
            a[a0] = t ^ b[(i + 13) % 16] ^ (b[(i + 9) % 16] & !b[(i + 6) % 16]) ^ m[i];
            b[i] = !(b[i].rotate_left(1) ^ a[a0]);
        }
        for j in 0..12 {
            a[j] = a[j]
                .wrapping_add(c[(j + 11) % 16])
                .wrapping_add(c[(j + 15) % 16])
                .wrapping_add(c[(j + 3) % 16]);
        }
    }

    #[test]
    fn test_apply_p_lanes() {
        let mut rng = StdRng::seed_from_u64(48);
        let mut sa = [[0u32; 12]; 4];
        let mut sb = [[0u32; 16]; 4];
        let mut sc = [[0u32; 16]; 4];
        let mut sm = [[0u32; 16]; 4];
        for l in 0..4 {
            sa[l] = core::array::from_fn(|_| rng.random());
            sb[l] = core::array::from_fn(|_| rng.random());
            sc[l] = core::array::from_fn(|_| rng.random());
            sm[l] = core::array::from_fn(|_| rng.random());
        }

        let mut a: [Lanes<4>; 12] = core::array::from_fn(|j| Lanes(sa.map(|x| x[j])));
        let mut b: [Lanes<4>; 16] = core::array::from_fn(|j| Lanes(sb.map(|x| x[j])));
        let c: [Lanes<4>; 16] = core::array::from_fn(|j| Lanes(sc.map(|x| x[j])));
        let m: [Lanes<4>; 16] = core::array::from_fn(|j| Lanes(sm.map(|x| x[j])));
        apply_p(&mut a, &mut b, &c, &m);

        for l in 0..4 {
            apply_p_scalar(&mut sa[l], &mut sb[l], &sc[l], &sm[l]);
            for j in 0..12 {
                assert_eq!(a[j].0[l], sa[l][j], "A[{j}] lane {l}");
            }
            for j in 0..16 {
                assert_eq!(b[j].0[l], sb[l][j], "B[{j}] lane {l}");
            }
        }
    }

    #[test]
    fn test_mul_by_shift() {
        let x = Lanes::<4>([0, 1, 0x5555_5555, u32::MAX]);
        assert_eq!(mul3(x).0, x.0.map(|v| v.wrapping_mul(3)));
        assert_eq!(mul5(x).0, x.0.map(|v| v.wrapping_mul(5)));
    }
}
