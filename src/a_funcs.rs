use enum_dispatch::enum_dispatch;
use rand::Rng;
use serde::{Deserialize, Serialize};

use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

/// A nonlinearity applied to the output of a dense layer.
#[enum_dispatch]
pub trait ActivFunc {
    /// Evaluate the function at a single point.
    fn evaluate(&self, x: f32) -> f32;

    /// Apply the function in place to the outputs of a single pixel.
    /// Pointwise functions keep the default, functions that mix channels override it.
    fn apply(&self, values: &mut [f32]) {
        for v in values {
            *v = self.evaluate(*v);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Identity;
impl ActivFunc for Identity {
    fn evaluate(&self, x: f32) -> f32 {
        x
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sigmoid;
impl ActivFunc for Sigmoid {
    fn evaluate(&self, x: f32) -> f32 {
        1. / (1. + (-x).exp())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TanH;
impl ActivFunc for TanH {
    fn evaluate(&self, x: f32) -> f32 {
        x.tanh()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReLU;
impl ActivFunc for ReLU {
    fn evaluate(&self, x: f32) -> f32 {
        f32::max(x, 0.)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReLU6;
impl ActivFunc for ReLU6 {
    fn evaluate(&self, x: f32) -> f32 {
        x.max(0.).min(6.)
    }
}

/// Normalized exponential over the channels of a pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Softmax;
impl ActivFunc for Softmax {
    /// A single channel always receives the whole probability mass.
    fn evaluate(&self, _x: f32) -> f32 {
        1.
    }

    fn apply(&self, values: &mut [f32]) {
        let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let mut total = 0.;
        for v in values.iter_mut() {
            *v = (*v - max).exp();
            total += *v;
        }
        for v in values.iter_mut() {
            *v /= total;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Softplus;
impl ActivFunc for Softplus {
    fn evaluate(&self, x: f32) -> f32 {
        // ln(1 + e^x) without overflowing for large x
        x.max(0.) + (-x.abs()).exp().ln_1p()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Softsign;
impl ActivFunc for Softsign {
    fn evaluate(&self, x: f32) -> f32 {
        x / (1. + x.abs())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeLU;
impl SeLU {
    pub const ALPHA: f32 = 1.673_263_2;
    pub const SCALE: f32 = 1.050_701;
}
impl ActivFunc for SeLU {
    fn evaluate(&self, x: f32) -> f32 {
        if x > 0. {
            Self::SCALE * x
        } else {
            Self::SCALE * Self::ALPHA * x.exp_m1()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ELU;
impl ActivFunc for ELU {
    fn evaluate(&self, x: f32) -> f32 {
        if x > 0. {
            x
        } else {
            x.exp_m1()
        }
    }
}

/// Piecewise linear approximation of the sigmoid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HardSigmoid;
impl ActivFunc for HardSigmoid {
    fn evaluate(&self, x: f32) -> f32 {
        (0.2 * x + 0.5).max(0.).min(1.)
    }
}

/// The closed catalog of activations a randomly built network can pick from.
#[enum_dispatch(ActivFunc)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Activation {
    Identity(Identity),
    Sigmoid(Sigmoid),
    TanH(TanH),
    ReLU(ReLU),
    ReLU6(ReLU6),
    Softmax(Softmax),
    Softplus(Softplus),
    Softsign(Softsign),
    SeLU(SeLU),
    ELU(ELU),
    HardSigmoid(HardSigmoid),
}

impl Activation {
    pub const ALL: [Activation; 11] = [
        Activation::Identity(Identity),
        Activation::Sigmoid(Sigmoid),
        Activation::TanH(TanH),
        Activation::ReLU(ReLU),
        Activation::ReLU6(ReLU6),
        Activation::Softmax(Softmax),
        Activation::Softplus(Softplus),
        Activation::Softsign(Softsign),
        Activation::SeLU(SeLU),
        Activation::ELU(ELU),
        Activation::HardSigmoid(HardSigmoid),
    ];

    /// Draw an activation uniformly from the catalog.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0, Self::ALL.len())]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Activation::Identity(_) => "identity",
            Activation::Sigmoid(_) => "sigmoid",
            Activation::TanH(_) => "tanh",
            Activation::ReLU(_) => "relu",
            Activation::ReLU6(_) => "relu6",
            Activation::Softmax(_) => "softmax",
            Activation::Softplus(_) => "softplus",
            Activation::Softsign(_) => "softsign",
            Activation::SeLU(_) => "selu",
            Activation::ELU(_) => "elu",
            Activation::HardSigmoid(_) => "hard_sigmoid",
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing a name that isn't in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown activation function '{0}'")]
pub struct UnknownActivation(pub String);

impl FromStr for Activation {
    type Err = UnknownActivation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.name() == s)
            .ok_or_else(|| UnknownActivation(s.to_owned()))
    }
}

impl TryFrom<String> for Activation {
    type Error = UnknownActivation;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Activation> for String {
    fn from(a: Activation) -> Self {
        a.name().to_owned()
    }
}
