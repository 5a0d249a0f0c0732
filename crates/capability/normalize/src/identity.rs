//! 设备 ID → 船舶 / 货物标识的映射点。

use std::collections::HashMap;

/// 读数归属标识。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingIdentity {
    pub ship_id: String,
    pub cargo_id: String,
}

/// 设备标识映射表。
///
/// 未登记的设备以设备 ID 同时作为船舶与货物标识，保证读数仍可寻址。
#[derive(Debug, Clone, Default)]
pub struct DeviceIdentityMap {
    entries: HashMap<String, ReadingIdentity>,
}

impl DeviceIdentityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        device_id: impl Into<String>,
        ship_id: impl Into<String>,
        cargo_id: impl Into<String>,
    ) {
        self.entries.insert(
            device_id.into(),
            ReadingIdentity {
                ship_id: ship_id.into(),
                cargo_id: cargo_id.into(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn resolve(&self, device_id: &str) -> ReadingIdentity {
        match self.entries.get(device_id) {
            Some(identity) => identity.clone(),
            None => ReadingIdentity {
                ship_id: device_id.to_string(),
                cargo_id: device_id.to_string(),
            },
        }
    }
}

impl<D, S, C> FromIterator<(D, S, C)> for DeviceIdentityMap
where
    D: Into<String>,
    S: Into<String>,
    C: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (D, S, C)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (device_id, ship_id, cargo_id) in iter {
            map.insert(device_id, ship_id, cargo_id);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_registered_device() {
        let map: DeviceIdentityMap = [("eui-1", "S1", "C1")].into_iter().collect();
        assert_eq!(
            map.resolve("eui-1"),
            ReadingIdentity {
                ship_id: "S1".to_string(),
                cargo_id: "C1".to_string(),
            }
        );
    }

    #[test]
    fn unknown_device_falls_back_to_device_id() {
        let map = DeviceIdentityMap::new();
        let identity = map.resolve("eui-9");
        assert_eq!(identity.ship_id, "eui-9");
        assert_eq!(identity.cargo_id, "eui-9");
    }
}
