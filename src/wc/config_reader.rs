use crate::wc::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "contestDate")]
    pub contest_date: Option<String>,
    #[serde(rename = "contestJurisdiction")]
    pub contest_jurisdiction: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: String,
    pub date: Option<String>,
    pub jurisdiction: Option<String>,
}

/// Head count by gender. Signed so that negative counts can be reported
/// instead of failing to parse.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct WorkforceConfig {
    pub men: i64,
    pub women: i64,
    #[serde(rename = "nonBinary", default)]
    pub non_binary: i64,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct MemberConfig {
    pub id: String,
    pub gender: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    pub id: String,
    pub name: Option<String>,
    #[serde(default)]
    pub votes: i64,
    #[serde(default)]
    pub members: Vec<MemberConfig>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct WcConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    pub workforce: WorkforceConfig,
    #[serde(default)]
    pub lists: Vec<ListConfig>,
}

pub fn read_config(path: &str) -> WcResult<WcConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read config: {:?}", contents);
    let config: WcConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: &str) -> WcResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read summary: {:?}", contents);
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}
