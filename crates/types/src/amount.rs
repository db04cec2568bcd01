//! Arbitrary-precision token amounts and their serde representation.
//!
//! Amounts routinely exceed `u64` (minting is denominated in the smallest
//! unit), so they are carried as [`BigUint`] and serialized as decimal strings.
//! Deserialization also accepts plain unsigned integers for hand-written
//! configuration files.

use num_bigint::BigUint;
use serde::{de, Deserialize, Deserializer, Serializer};
use std::str::FromStr;

/// Token amount in the smallest denomination.
pub type Amount = BigUint;

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Text(String),
    Int(u64),
}

impl AmountRepr {
    fn into_amount<E: de::Error>(self) -> Result<Amount, E> {
        match self {
            AmountRepr::Text(text) => BigUint::from_str(text.trim())
                .map_err(|_| E::custom(format!("invalid amount {text:?}"))),
            AmountRepr::Int(value) => Ok(BigUint::from(value)),
        }
    }
}

pub fn serialize<S>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&amount.to_str_radix(10))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Amount, D::Error>
where
    D: Deserializer<'de>,
{
    AmountRepr::deserialize(deserializer)?.into_amount()
}

/// `Option<Amount>` fields (e.g. a header's base fee).
pub mod option {
    use super::{Amount, AmountRepr};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(amount: &Option<Amount>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match amount {
            Some(value) => serializer.serialize_some(&value.to_str_radix(10)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Amount>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<AmountRepr>::deserialize(deserializer)?
            .map(AmountRepr::into_amount)
            .transpose()
    }
}

/// Address-keyed amount maps (reward tables, stake shares).
pub mod map {
    use super::{Amount, AmountRepr};
    use crate::address::Address;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::HashMap;

    pub fn serialize<S>(map: &HashMap<Address, Amount>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Sorted so that identical maps always encode to identical bytes.
        let mut entries: Vec<_> = map.iter().collect();
        entries.sort_by_key(|(addr, _)| **addr);

        let mut out = serializer.serialize_map(Some(entries.len()))?;
        for (addr, amount) in entries {
            out.serialize_entry(addr, &amount.to_str_radix(10))?;
        }
        out.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<HashMap<Address, Amount>, D::Error>
    where
        D: Deserializer<'de>,
    {
        HashMap::<Address, AmountRepr>::deserialize(deserializer)?
            .into_iter()
            .map(|(addr, repr)| repr.into_amount().map(|amount| (addr, amount)))
            .collect()
    }
}
