//! Climate data source configuration.

use storage::ObjectStorageConfig;

/// Default MeteoSwiss variable: daily mean air temperature.
pub const DEFAULT_VARIABLE: &str = "TabsD";

/// Default object key layout; `{variable}` and `{year}` are substituted.
pub const DEFAULT_KEY_TEMPLATE: &str =
    "{variable}/{variable}_ch01r.swisscorr_{year}01010000_{year}12310000.nc";

/// Where and how to fetch the gridded temperature product.
#[derive(Debug, Clone)]
pub struct ClimateSourceConfig {
    pub storage: ObjectStorageConfig,
    /// NetCDF variable name
    pub variable: String,
    /// Object key template for one year of data
    pub key_template: String,
}

impl Default for ClimateSourceConfig {
    fn default() -> Self {
        Self {
            storage: ObjectStorageConfig::default(),
            variable: DEFAULT_VARIABLE.to_string(),
            key_template: DEFAULT_KEY_TEMPLATE.to_string(),
        }
    }
}

impl ClimateSourceConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            storage: ObjectStorageConfig::from_env(),
            variable: std::env::var("METEOSWISS_VARIABLE")
                .unwrap_or_else(|_| DEFAULT_VARIABLE.to_string()),
            key_template: std::env::var("METEOSWISS_KEY_TEMPLATE")
                .unwrap_or_else(|_| DEFAULT_KEY_TEMPLATE.to_string()),
        }
    }

    /// Object key holding `year` of the configured variable.
    pub fn object_key(&self, year: i32) -> String {
        self.key_template
            .replace("{variable}", &self.variable)
            .replace("{year}", &year.to_string())
    }
}
