use std::sync::{Arc, PoisonError, RwLock};

use blstrs::{G1Affine, G2Affine};
use elliptic_curve::Group;
use serde::{Deserialize, Serialize};

use crate::crypto::constants::{BLS12_381_ORDER, PYTHIA_G1_DOMAIN, PYTHIA_G2_DOMAIN};
use crate::crypto::hash::{hash_to_g1, hash_to_g2};
use crate::errors::{PythiaError, Result};
use crate::{ElementG1, ElementG2, ElementGt};

/// Longest domain separation tag accepted by `expand_message_xmd`.
const MAX_DOMAIN_LEN: usize = 255;

/// Pairing-friendly curves the engine can be instantiated over.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum CurveKind {
    #[default]
    #[serde(rename = "bls12_381")]
    Bls12_381,
}

/// Parameters selected when the engine is initialized.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PythiaConfig {
    #[serde(default)]
    pub curve: CurveKind,
    /// Overrides the domain separation tag of the password hash into G1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub g1_domain: Option<String>,
    /// Overrides the domain separation tag of the tweak hash into G2.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub g2_domain: Option<String>,
}

/// Immutable parameters shared by every engine operation: generators, group
/// orders and hash domains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythiaContext {
    curve: CurveKind,
    g1: ElementG1,
    gt: ElementGt,
    g1_order: [u8; 32],
    gt_order: [u8; 32],
    g1_domain: Vec<u8>,
    g2_domain: Vec<u8>,
}

fn checked_domain(domain: Option<&str>, default: &str) -> Result<Vec<u8>> {
    let domain = domain.unwrap_or(default);
    if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN {
        return Err(PythiaError::arithmetic(format!(
            "hash domain must be between 1 and {MAX_DOMAIN_LEN} bytes, got {}",
            domain.len()
        )));
    }
    Ok(domain.as_bytes().to_vec())
}

impl PythiaContext {
    pub fn new(config: &PythiaConfig) -> Result<Self> {
        let g1_domain = checked_domain(config.g1_domain.as_deref(), PYTHIA_G1_DOMAIN)?;
        let g2_domain = checked_domain(config.g2_domain.as_deref(), PYTHIA_G2_DOMAIN)?;

        let g1 = ElementG1::generator();
        let gt = blstrs::pairing(&G1Affine::from(g1), &G2Affine::from(ElementG2::generator()));
        if bool::from(gt.is_identity()) {
            return Err(PythiaError::arithmetic("degenerate pairing"));
        }

        Ok(Self {
            curve: config.curve,
            g1,
            gt,
            g1_order: BLS12_381_ORDER,
            gt_order: BLS12_381_ORDER,
            g1_domain,
            g2_domain,
        })
    }

    pub fn curve(&self) -> CurveKind {
        self.curve
    }

    /// Generator of G1.
    pub fn g1(&self) -> ElementG1 {
        self.g1
    }

    /// Generator of GT, `e(g1, g2)`.
    pub fn gt(&self) -> ElementGt {
        self.gt
    }

    /// Order n1 of G1 and G2, big-endian.
    pub fn g1_order(&self) -> &[u8; 32] {
        &self.g1_order
    }

    /// Order n2 of GT, big-endian.
    pub fn gt_order(&self) -> &[u8; 32] {
        &self.gt_order
    }

    /// H1
    pub fn hash_password(&self, password: &[u8]) -> ElementG1 {
        hash_to_g1(password, &self.g1_domain)
    }

    /// H2
    pub fn hash_tweak(&self, tweak: &[u8]) -> ElementG2 {
        hash_to_g2(tweak, &self.g2_domain)
    }
}

/// Holder of a process-wide [`PythiaContext`].
///
/// Moves between `Uninitialized` and `Ready`. Operations that go through the
/// holder fail with [`PythiaError::NotInitialized`] until `init` succeeds.
#[derive(Debug, Default)]
pub struct Lifecycle {
    state: RwLock<Option<Arc<PythiaContext>>>,
}

static GLOBAL: Lifecycle = Lifecycle::new();

impl Lifecycle {
    pub const fn new() -> Self {
        Self {
            state: RwLock::new(None),
        }
    }

    /// The process-wide instance.
    pub fn global() -> &'static Lifecycle {
        &GLOBAL
    }

    /// Moves to `Ready`. Calling it again while `Ready` keeps the existing
    /// context and ignores `config`.
    pub fn init(&self, config: &PythiaConfig) -> Result<Arc<PythiaContext>> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(context) = state.as_ref() {
            tracing::debug!("pythia already initialized");
            return Ok(Arc::clone(context));
        }
        let context = Arc::new(PythiaContext::new(config)?);
        *state = Some(Arc::clone(&context));
        tracing::info!(curve = ?config.curve, "pythia initialized");
        Ok(context)
    }

    /// Moves back to `Uninitialized`. Contexts already handed out stay valid.
    pub fn deinit(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.take().is_some() {
            tracing::info!("pythia deinitialized");
        }
    }

    pub fn context(&self) -> Result<Arc<PythiaContext>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(Arc::clone)
            .ok_or(PythiaError::NotInitialized)
    }

    pub fn is_ready(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
