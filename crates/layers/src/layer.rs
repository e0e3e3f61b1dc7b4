use crate::connector::DeliveryEdge;
use crate::labels::LabelPlacement;

/// What a map layer draws.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerKind {
    Connector,
    OriginMarker,
    DestinationMarker,
    OriginLabel,
    DestinationLabel,
}

/// Map layers are keyed by kind and owning country, so every owner has at
/// most one layer of each kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId {
    pub kind: LayerKind,
    pub owner: String,
}

impl LayerId {
    pub fn new(kind: LayerKind, owner: impl Into<String>) -> Self {
        Self {
            kind,
            owner: owner.into(),
        }
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}:{}", self.kind, self.owner)
    }
}

pub trait Layer {
    fn id(&self) -> LayerId;
}

impl Layer for DeliveryEdge {
    fn id(&self) -> LayerId {
        LayerId::new(LayerKind::Connector, self.destination_id.as_str())
    }
}

impl Layer for LabelPlacement {
    fn id(&self) -> LayerId {
        LayerId::new(LayerKind::DestinationLabel, self.owner_id.as_str())
    }
}
