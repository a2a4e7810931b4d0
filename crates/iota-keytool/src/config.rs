//! Keytool configuration.
//!
//! A TOML file selects the codec preset and output encoding, sets logging
//! defaults and declares the BCS types that `encode` and `decode` can use.

use iota_bcs::{Bcs, CodecConfig, Encoding, IOTA_ADDRESS_LENGTH};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Codec flavour the registry starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecPreset {
    /// `vector<T>`, Move on-chain types
    #[default]
    Move,
    /// `Vec<T>` and `String`
    Rust,
}

/// Keytool configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeytoolConfig {
    /// Codec preset
    pub codec: CodecPreset,
    /// Address width in bytes
    pub address_length: usize,
    /// Encoding for `encode` output and the default for `decode` input
    pub output_encoding: Encoding,
    /// Register the MultiSig wire types (Move preset only)
    pub signature_types: bool,
    /// Logging configuration
    pub logging: LoggingConfig,
    pub structs: Vec<StructDef>,
    pub enums: Vec<EnumDef>,
    pub aliases: Vec<AliasDef>,
    pub fixed_arrays: Vec<FixedArrayDef>,
}

impl Default for KeytoolConfig {
    fn default() -> Self {
        Self {
            codec: CodecPreset::Move,
            address_length: IOTA_ADDRESS_LENGTH,
            output_encoding: Encoding::Hex,
            signature_types: true,
            logging: LoggingConfig::default(),
            structs: vec![],
            enums: vec![],
            aliases: vec![],
            fixed_arrays: vec![],
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive
    pub level: String,
    /// Emit JSON lines instead of text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDef {
    /// May declare generic parameters, e.g. `Coin<T>`
    pub name: String,
    pub fields: Vec<FieldDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDef {
    pub name: String,
    /// Wire index is the position in this list
    pub variants: Vec<VariantDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantDef {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasDef {
    pub name: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedArrayDef {
    pub name: String,
    pub element: String,
    pub length: usize,
}

impl KeytoolConfig {
    /// Load configuration from file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
        Self::from_toml(&contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e))
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validate configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.address_length == 0 {
            anyhow::bail!("Address length cannot be 0");
        }
        if self.signature_types && self.codec == CodecPreset::Rust {
            anyhow::bail!("MultiSig types need the move codec preset; set signature_types = false");
        }

        let mut names = HashSet::new();
        let declared = self
            .structs
            .iter()
            .map(|s| s.name.as_str())
            .chain(self.enums.iter().map(|e| e.name.as_str()))
            .chain(self.aliases.iter().map(|a| a.name.as_str()))
            .chain(self.fixed_arrays.iter().map(|f| f.name.as_str()));
        for name in declared {
            // `Coin<T>` and `Coin` name the same registry entry
            let base = name.split('<').next().unwrap_or(name).trim();
            if base.is_empty() {
                anyhow::bail!("Type name cannot be empty");
            }
            if !names.insert(base.to_string()) {
                anyhow::bail!("Type '{}' is declared more than once", base);
            }
        }

        for def in &self.enums {
            if def.variants.is_empty() {
                anyhow::bail!("Enum '{}' has no variants", def.name);
            }
        }
        Ok(())
    }

    pub fn codec_config(&self) -> CodecConfig {
        let config = match self.codec {
            CodecPreset::Move => CodecConfig::iota_move(),
            CodecPreset::Rust => CodecConfig::rust(),
        };
        config.with_address_length(self.address_length)
    }

    /// Build a registry holding every declared type.
    ///
    /// Structs and enums are registered first since their fields resolve
    /// lazily; fixed arrays and aliases resolve their targets immediately.
    pub fn build_registry(&self) -> anyhow::Result<Bcs> {
        let bcs = Bcs::new(self.codec_config());
        if self.signature_types {
            iota_crypto::register_signature_types(&bcs)?;
        }

        for def in &self.structs {
            bcs.register_struct(
                &def.name,
                def.fields.iter().map(|f| (f.name.as_str(), f.ty.as_str())),
            )
            .map_err(|e| anyhow::anyhow!("struct '{}': {}", def.name, e))?;
        }
        for def in &self.enums {
            bcs.register_enum(
                &def.name,
                def.variants.iter().map(|v| (v.name.as_str(), v.ty.as_deref())),
            )
            .map_err(|e| anyhow::anyhow!("enum '{}': {}", def.name, e))?;
        }
        for def in &self.fixed_arrays {
            bcs.register_fixed_array(&def.name, def.element.as_str(), def.length)
                .map_err(|e| anyhow::anyhow!("fixed array '{}': {}", def.name, e))?;
        }
        for def in &self.aliases {
            bcs.register_alias(&def.name, def.target.as_str())
                .map_err(|e| anyhow::anyhow!("alias '{}': {}", def.name, e))?;
        }

        debug!(
            structs = self.structs.len(),
            enums = self.enums.len(),
            aliases = self.aliases.len(),
            fixed_arrays = self.fixed_arrays.len(),
            "registry built"
        );
        Ok(bcs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iota_bcs::Value;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
codec = "move"
output_encoding = "base64"

[logging]
level = "debug"

[[structs]]
name = "Coin<T>"
fields = [{ name = "value", type = "u64" }, { name = "owner", type = "T" }]

[[enums]]
name = "Status"
variants = [{ name = "Active" }, { name = "Frozen", type = "Reason" }]

[[fixed_arrays]]
name = "Digest"
element = "u8"
length = 4

[[structs]]
name = "Reason"
fields = [{ name = "code", type = "u16" }]

[[aliases]]
name = "AddressCoin"
target = "Coin<address>"
"#;

    #[test]
    fn test_default_config() {
        let config = KeytoolConfig::default();
        assert_eq!(config.codec, CodecPreset::Move);
        assert_eq!(config.address_length, 32);
        assert_eq!(config.logging.level, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_and_build_registry() {
        let config = KeytoolConfig::from_toml(SAMPLE).unwrap();
        assert_eq!(config.output_encoding, Encoding::Base64);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.enums[0].variants[1].ty.as_deref(), Some("Reason"));
        config.validate().unwrap();

        let bcs = config.build_registry().unwrap();
        assert!(bcs.has_type("MultiSig"));
        assert!(bcs.has_type("AddressCoin"));

        let bytes = bcs
            .serialize("Status", &Value::variant("Frozen", Value::struct_of([("code", Value::U16(7))])))
            .unwrap()
            .into_bytes();
        assert_eq!(bytes, vec![1, 7, 0]);
        assert_eq!(
            bcs.serialize("Digest", &Value::Bytes(vec![1, 2, 3, 4])).unwrap().into_bytes(),
            vec![1, 2, 3, 4]
        );
    }

    #[test]
    fn test_duplicate_type_names_rejected() {
        let mut config = KeytoolConfig::from_toml(SAMPLE).unwrap();
        config.aliases.push(AliasDef {
            name: "Coin".to_string(),
            target: "u8".to_string(),
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("declared more than once"));
    }

    #[test]
    fn test_rust_preset_needs_signature_types_off() {
        let mut config = KeytoolConfig {
            codec: CodecPreset::Rust,
            ..KeytoolConfig::default()
        };
        assert!(config.validate().is_err());
        config.signature_types = false;
        config.validate().unwrap();
        let bcs = config.build_registry().unwrap();
        assert!(bcs.has_type("Vec"));
        assert!(!bcs.has_type("MultiSig"));
    }

    #[test]
    fn test_unknown_alias_target_fails() {
        let config = KeytoolConfig::from_toml(
            r#"
[[aliases]]
name = "Thing"
target = "Missing"
"#,
        )
        .unwrap();
        let err = config.build_registry().unwrap_err();
        assert!(err.to_string().contains("alias 'Thing'"));
    }

    #[test]
    fn test_config_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("keytool.toml");
        std::fs::write(&config_path, SAMPLE).unwrap();

        let loaded = KeytoolConfig::from_file(&config_path).unwrap();
        assert_eq!(loaded, KeytoolConfig::from_toml(SAMPLE).unwrap());
    }

    #[test]
    fn test_config_path_with_parent_component() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("profiles")).unwrap();
        std::fs::write(temp_dir.path().join("keytool.toml"), SAMPLE).unwrap();

        let relative = temp_dir.path().join("profiles").join("..").join("keytool.toml");
        assert!(KeytoolConfig::from_file(&relative).is_ok());

        let err = KeytoolConfig::from_file(&temp_dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
