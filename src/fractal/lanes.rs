//! Petite abstraction "N lanes de scalaires" pour le noyau vectoriel.
//!
//! Les opérations sont écrites sur des tableaux de taille fixe, ce que le
//! compilateur transforme en instructions SIMD (SSE pour 4 lanes, AVX pour 8)
//! quand la cible le permet. Chaque lane effectue exactement les mêmes
//! opérations `f32` que le noyau scalaire, dans le même ordre.

use std::array;
use std::ops::{Add, BitAnd, Mul, Sub};

/// N flottants `f32`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct F32s<const N: usize>(pub [f32; N]);

/// N compteurs signés (le budget d'itérations restant par lane).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct I32s<const N: usize>(pub [i32; N]);

/// Masque actif par lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mask<const N: usize>(pub [bool; N]);

impl<const N: usize> F32s<N> {
    #[inline(always)]
    pub fn splat(v: f32) -> Self {
        Self([v; N])
    }

    #[inline(always)]
    pub fn from_fn(f: impl FnMut(usize) -> f32) -> Self {
        Self(array::from_fn(f))
    }

    /// Comparaison `<=` lane par lane. NaN donne `false`.
    #[inline(always)]
    pub fn le(self, other: Self) -> Mask<N> {
        Mask(array::from_fn(|i| self.0[i] <= other.0[i]))
    }
}

impl<const N: usize> Add for F32s<N> {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(array::from_fn(|i| self.0[i] + rhs.0[i]))
    }
}

impl<const N: usize> Sub for F32s<N> {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self(array::from_fn(|i| self.0[i] - rhs.0[i]))
    }
}

impl<const N: usize> Mul for F32s<N> {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self(array::from_fn(|i| self.0[i] * rhs.0[i]))
    }
}

impl<const N: usize> I32s<N> {
    #[inline(always)]
    pub fn splat(v: i32) -> Self {
        Self([v; N])
    }

    #[inline(always)]
    pub fn gt(self, other: Self) -> Mask<N> {
        Mask(array::from_fn(|i| self.0[i] > other.0[i]))
    }

    /// Retire 1 aux lanes actives, les autres restent figées.
    #[inline(always)]
    pub fn masked_decrement(self, mask: Mask<N>) -> Self {
        Self(array::from_fn(|i| self.0[i] - mask.0[i] as i32))
    }

    /// `a - self` lane par lane.
    #[inline(always)]
    pub fn subtract_from(self, a: i32) -> Self {
        Self(array::from_fn(|i| a - self.0[i]))
    }
}

impl<const N: usize> Mask<N> {
    #[inline(always)]
    pub fn splat(v: bool) -> Self {
        Self([v; N])
    }

    /// Les `k` premières lanes actives, les suivantes éteintes.
    #[inline(always)]
    pub fn first(k: usize) -> Self {
        Self(array::from_fn(|i| i < k))
    }

    #[inline(always)]
    pub fn none(self) -> bool {
        !self.0.iter().any(|&b| b)
    }
}

impl<const N: usize> BitAnd for Mask<N> {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self(array::from_fn(|i| self.0[i] & rhs.0[i]))
    }
}
