//! Device targeting filters for DFU requests.
//!
//! Every filter is a raw input string that may be empty, a single value, or a
//! comma-separated list. Lists expand into repeated query parameters
//! (`tags=a&tags=b`); single values are passed through untouched.

/// Query parameters for a DFU request, in insertion order.
///
/// Behaves like a multimap: [`add`](Self::add) appends, [`set`](Self::set)
/// replaces every existing value under the same name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &'static str, value: impl Into<String>) {
        self.pairs.push((name, value.into()));
    }

    pub fn set(&mut self, name: &'static str, value: impl Into<String>) {
        self.pairs.retain(|(k, _)| *k != name);
        self.pairs.push((name, value.into()));
    }

    /// Adds `value` under `name`, expanding comma-separated lists.
    ///
    /// Empty input contributes nothing. With a comma, each trimmed non-empty
    /// token becomes its own entry. Without one, the raw value is set as is.
    pub fn add_comma_separated(&mut self, name: &'static str, value: &str) {
        if value.is_empty() {
            return;
        }

        if value.contains(',') {
            for token in value.split(',').map(str::trim) {
                if !token.is_empty() {
                    self.add(name, token);
                }
            }
        } else {
            self.set(name, value);
        }
    }

    /// Returns all values recorded under `name`.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }
}

/// The eight optional device filters accepted by the DFU endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Targeting {
    pub device_uid: String,
    pub tag: String,
    pub serial_number: String,
    pub fleet_uid: String,
    pub product_uid: String,
    pub notecard_firmware: String,
    pub location: String,
    pub sku: String,
}

impl Targeting {
    /// Builds the DFU query. Empty filters are skipped.
    pub fn query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        for (name, value) in self.fields() {
            params.add_comma_separated(name, value);
        }
        params
    }

    /// Returns `true` when no filter is set, i.e. the DFU goes out unfiltered.
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, v)| v.is_empty())
    }

    /// Query parameter name paired with each filter value.
    pub fn fields(&self) -> [(&'static str, &str); 8] {
        [
            ("deviceUID", self.device_uid.as_str()),
            ("tags", self.tag.as_str()),
            ("serialNumber", self.serial_number.as_str()),
            ("fleetUID", self.fleet_uid.as_str()),
            ("productUID", self.product_uid.as_str()),
            ("notecardFirmware", self.notecard_firmware.as_str()),
            ("location", self.location.as_str()),
            ("sku", self.sku.as_str()),
        ]
    }
}
