use core::ptr;
use std::sync::atomic;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::Scalar;

/// A scalar that is wiped from memory when dropped.
///
/// Blinding factors, transformation keys and proof nonces are all held in
/// this wrapper so that no copy of them outlives the call that produced it.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct SecretScalar(Scalar);

impl SecretScalar {
    pub fn new(scalar: Scalar) -> Self {
        Self(scalar)
    }

    /// Copies the inner scalar out. The copy is not zeroized.
    pub fn expose(&self) -> Scalar {
        self.0
    }
}

impl std::fmt::Debug for SecretScalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretScalar(..)")
    }
}

impl Zeroize for SecretScalar {
    /// `blstrs::Scalar` does not implement `Zeroize`, so write the default
    /// value through a volatile pointer and fence to keep the store from being
    /// optimized away.
    fn zeroize(&mut self) {
        unsafe {
            ptr::write_volatile(&mut self.0, Scalar::default());
        }
        atomic::compiler_fence(atomic::Ordering::SeqCst);
    }
}

impl Drop for SecretScalar {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for SecretScalar {}
