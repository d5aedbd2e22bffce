//! Types for use when configuring burrow modules.

use crate::*;

/// helper transcode function
fn tc<S: serde::Serialize, D: serde::de::DeserializeOwned>(
    s: &S,
) -> BurrowResult<D> {
    serde_json::from_str(
        &serde_json::to_string(s)
            .map_err(|e| BurrowError::other_src("encode", e))?,
    )
    .map_err(|e| BurrowError::other_src("decode", e))
}

/// Denotes a type used to configure a specific burrow module.
///
/// The types defined in this struct are specifically for configuration
/// that cannot be changed at runtime, the likes of which might be found
/// in a configuration file.
///
/// It is highly recommended that you expose this struct in your module
/// docs to help devs using your module understand how to configure it.
pub trait ModConfig:
    'static
    + Sized
    + Default
    + std::fmt::Debug
    + serde::Serialize
    + serde::de::DeserializeOwned
    + Send
    + Sync
{
}

/// Burrow configuration.
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Config(serde_json::Map<String, serde_json::Value>);

impl Config {
    /// When burrow is generating a default or example configuration
    /// file, it will pass a mutable reference of this config struct to
    /// the module factories that are configured to be used. Those factories
    /// should call this function any number of times to add any default
    /// configuration parameters to that file.
    pub fn add_default_module_config<M: ModConfig>(
        &mut self,
        module_name: String,
    ) -> BurrowResult<()> {
        if self.0.contains_key(&module_name) {
            return Err(BurrowError::other(format!(
                "Refusing to overwrite conflicting module name: {module_name}"
            )));
        }
        self.0.insert(module_name, tc(&M::default())?);
        Ok(())
    }

    /// When burrow is initializing, it will call the factory function
    /// for all of its modules with an immutable reference to this config
    /// struct. Each of those modules may choose to call this function
    /// to extract a module config. Note that this config is loaded from
    /// disk and can be edited by humans, so the serialization on the module
    /// config should be tolerant to missing properties, setting sane
    /// defaults.
    pub fn get_module_config<M: ModConfig>(
        &self,
        module_name: &str,
    ) -> BurrowResult<M> {
        self.0
            .get(module_name)
            .map(tc)
            .unwrap_or_else(|| Ok(M::default()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, Default, serde::Serialize, serde::Deserialize, PartialEq)]
    #[serde(default)]
    struct TestMod {
        poll_interval_s: u32,
        server_url: String,
    }

    impl ModConfig for TestMod {}

    #[test]
    fn default_config_is_generated() {
        let mut config = Config::default();
        config
            .add_default_module_config::<TestMod>("testMod".into())
            .unwrap();

        assert_eq!(
            r##"{
  "testMod": {
    "poll_interval_s": 0,
    "server_url": ""
  }
}"##,
            serde_json::to_string_pretty(&config).unwrap()
        );

        // refuse to double-register a module name
        assert!(config
            .add_default_module_config::<TestMod>("testMod".into())
            .is_err());
    }

    #[test]
    fn tolerates_human_edited_config() {
        // extraneous modules and properties are ignored,
        // missing properties get defaults
        let config: Config = serde_json::from_str(
            r#"{
          "unknownMod": { "foo": "bar" },
          "testMod": { "server_url": "https://b.url", "extra": 1 }
        }"#,
        )
        .unwrap();

        assert_eq!(
            TestMod {
                poll_interval_s: 0,
                server_url: "https://b.url".to_string(),
            },
            config.get_module_config::<TestMod>("testMod").unwrap(),
        );

        // unset modules get the default
        assert_eq!(
            TestMod::default(),
            config.get_module_config::<TestMod>("NOT-SET").unwrap(),
        );
    }
}
