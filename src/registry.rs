use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of one prediction backend, used verbatim in the endpoint path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ModelId(&'static str);

impl ModelId {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Registered backends in query and display order.
pub const MODELS: [ModelId; 5] = [
    ModelId::new("denseNetModel"),
    ModelId::new("inceptionV3"),
    ModelId::new("Xception"),
    ModelId::new("cnnscratch"),
    ModelId::new("vgg19"),
];

pub const CLASS_COUNT: usize = 4;

/// Class vocabulary shared by every model. Declaration order is the index
/// order of `prediction_percentages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassLabel {
    Glioma,
    Meningioma,
    NoTumor,
    Pituitary,
}

impl ClassLabel {
    pub const ALL: [ClassLabel; CLASS_COUNT] = [
        ClassLabel::Glioma,
        ClassLabel::Meningioma,
        ClassLabel::NoTumor,
        ClassLabel::Pituitary,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClassLabel::Glioma => "glioma",
            ClassLabel::Meningioma => "meningioma",
            ClassLabel::NoTumor => "no_tumor",
            ClassLabel::Pituitary => "pituitary",
        }
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
