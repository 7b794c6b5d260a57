//! Upgrade purchases between runs
//!
//! Jump upgrades form a chain (double → triple → quad); the session picks up
//! the new capacity on its next start.

use thiserror::Error;

use super::ProfileData;

/// Purchasable items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upgrade {
    DoubleJump,
    TripleJump,
    QuadJump,
    Mask,
}

impl Upgrade {
    pub const ALL: [Upgrade; 4] = [
        Upgrade::DoubleJump,
        Upgrade::TripleJump,
        Upgrade::QuadJump,
        Upgrade::Mask,
    ];

    pub fn price(self) -> u64 {
        match self {
            Upgrade::DoubleJump => 50,
            Upgrade::TripleJump => 150,
            Upgrade::QuadJump => 300,
            Upgrade::Mask => 100,
        }
    }

    /// Jump capacity granted, for jump upgrades
    pub fn jump_level(self) -> Option<u8> {
        match self {
            Upgrade::DoubleJump => Some(2),
            Upgrade::TripleJump => Some(3),
            Upgrade::QuadJump => Some(4),
            Upgrade::Mask => None,
        }
    }

    /// Upgrade that must be owned first
    pub fn requires(self) -> Option<Upgrade> {
        match self {
            Upgrade::TripleJump => Some(Upgrade::DoubleJump),
            Upgrade::QuadJump => Some(Upgrade::TripleJump),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Upgrade::DoubleJump => "double_jump",
            Upgrade::TripleJump => "triple_jump",
            Upgrade::QuadJump => "quad_jump",
            Upgrade::Mask => "mask",
        }
    }
}

/// Why a purchase was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("{} already owned", .0.as_str())]
    AlreadyOwned(Upgrade),

    #[error("{} requires {}", .item.as_str(), .requires.as_str())]
    MissingPrerequisite { item: Upgrade, requires: Upgrade },

    #[error("costs {price} coins, balance is {balance}")]
    InsufficientFunds { price: u64, balance: u64 },
}

impl ProfileData {
    pub fn owns(&self, item: Upgrade) -> bool {
        match item.jump_level() {
            Some(level) => self.max_jumps >= level,
            None => self.has_mask,
        }
    }

    /// Buy an upgrade, deducting its price
    pub fn purchase(&mut self, item: Upgrade) -> Result<(), PurchaseError> {
        if self.owns(item) {
            return Err(PurchaseError::AlreadyOwned(item));
        }
        if let Some(requires) = item.requires() {
            if !self.owns(requires) {
                return Err(PurchaseError::MissingPrerequisite { item, requires });
            }
        }
        let price = item.price();
        if self.coins < price {
            return Err(PurchaseError::InsufficientFunds {
                price,
                balance: self.coins,
            });
        }

        self.coins -= price;
        match item.jump_level() {
            Some(level) => self.max_jumps = level,
            None => self.has_mask = true,
        }
        log::info!("Purchased {} for {} coins", item.as_str(), price);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rich() -> ProfileData {
        ProfileData {
            coins: 1000,
            ..ProfileData::default()
        }
    }

    #[test]
    fn test_jump_chain() {
        let mut data = rich();
        assert_eq!(
            data.purchase(Upgrade::TripleJump),
            Err(PurchaseError::MissingPrerequisite {
                item: Upgrade::TripleJump,
                requires: Upgrade::DoubleJump
            })
        );
        data.purchase(Upgrade::DoubleJump).expect("affordable");
        data.purchase(Upgrade::TripleJump).expect("affordable");
        assert_eq!(data.max_jumps, 3);
        assert_eq!(data.coins, 1000 - 50 - 150);
        assert_eq!(
            data.purchase(Upgrade::DoubleJump),
            Err(PurchaseError::AlreadyOwned(Upgrade::DoubleJump))
        );
    }

    #[test]
    fn test_insufficient_funds() {
        let mut data = ProfileData {
            coins: 20,
            ..ProfileData::default()
        };
        assert_eq!(
            data.purchase(Upgrade::DoubleJump),
            Err(PurchaseError::InsufficientFunds {
                price: 50,
                balance: 20
            })
        );
        assert_eq!(data.max_jumps, 1);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PurchaseError::AlreadyOwned(Upgrade::Mask).to_string(),
            "mask already owned"
        );
        assert_eq!(
            PurchaseError::MissingPrerequisite {
                item: Upgrade::QuadJump,
                requires: Upgrade::TripleJump
            }
            .to_string(),
            "quad_jump requires triple_jump"
        );
        assert_eq!(
            PurchaseError::InsufficientFunds {
                price: 300,
                balance: 12
            }
            .to_string(),
            "costs 300 coins, balance is 12"
        );
    }

    #[test]
    fn test_mask() {
        let mut data = rich();
        data.purchase(Upgrade::Mask).expect("affordable");
        assert!(data.has_mask);
        assert!(data.owns(Upgrade::Mask));
    }
}
