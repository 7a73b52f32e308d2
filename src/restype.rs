#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

//===========================================================================//

/// The resource type discriminator stored in the ICONDIR header.
///
/// Only icons are ever written; cursors are recognized on read so that a CUR
/// file can be reported as such rather than as garbage.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum ResourceType {
    /// Plain images (ICO files)
    Icon,
    /// Images with cursor hotspots (CUR files)
    Cursor,
}

impl ResourceType {
    pub(crate) fn from_number(number: u16) -> Option<ResourceType> {
        match number {
            1 => Some(ResourceType::Icon),
            2 => Some(ResourceType::Cursor),
            _ => None,
        }
    }

    pub(crate) fn number(&self) -> u16 {
        match *self {
            ResourceType::Icon => 1,
            ResourceType::Cursor => 2,
        }
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::ResourceType;

    #[test]
    fn icon_is_type_one() {
        assert_eq!(ResourceType::Icon.number(), 1);
        assert_eq!(ResourceType::from_number(1), Some(ResourceType::Icon));
    }

    #[test]
    fn unknown_numbers_are_rejected() {
        assert_eq!(ResourceType::from_number(0), None);
        assert_eq!(ResourceType::from_number(3), None);
    }

    #[test]
    fn resource_type_round_trip() {
        for &restype in [ResourceType::Icon, ResourceType::Cursor].iter() {
            assert_eq!(
                ResourceType::from_number(restype.number()),
                Some(restype)
            );
        }
    }
}

//===========================================================================//
