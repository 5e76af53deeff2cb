//! Property-based tests for the CLI pipeline.

use modkit_analyzer::{ModuleAnalyzer, SourceFile};
use modkit_cli::config::{CliArgs, Config, ConfigManager};
use proptest::prelude::*;

proptest! {
    /// Generated field declarations all survive the pipeline, in order.
    #[test]
    fn prop_fields_survive_analysis(
        names in prop::collection::btree_set("[a-z][a-z0-9_]{0,8}", 1..6)
    ) {
        let fields: String = names
            .iter()
            .map(|n| format!("    #[field]\n    pub f_{n}: String,\n"))
            .collect();
        let source = format!("#[object_type]\npub struct Main {{\n{fields}}}\n");

        let metadata = ModuleAnalyzer::new("m")
            .analyze(&[SourceFile::new("lib.rs", source)])
            .unwrap();

        let main = metadata.get_object("Main").unwrap();
        prop_assert_eq!(main.fields.len(), names.len());
        for (field, name) in main.fields.iter().zip(names.iter()) {
            prop_assert_eq!(&field.name, &format!("f_{name}"));
        }
    }

    /// CLI overrides always win over config file values.
    #[test]
    fn prop_cli_args_override_config(
        file_name in "[a-z][a-z-]{0,10}",
        cli_name in "[a-z][a-z-]{0,10}",
    ) {
        let mut config = Config::default();
        config.module.name = Some(file_name);

        let merged = ConfigManager::merge_cli_args(
            config,
            &CliArgs {
                module_name: Some(cli_name.clone()),
                ..Default::default()
            },
        );
        prop_assert_eq!(merged.module.name.as_deref(), Some(cli_name.as_str()));
    }

    /// Merging empty arguments changes nothing.
    #[test]
    fn prop_empty_args_preserve_config(name in "[a-z][a-z-]{0,10}") {
        let mut config = Config::default();
        config.module.name = Some(name.clone());

        let merged = ConfigManager::merge_cli_args(config, &CliArgs::default());
        prop_assert_eq!(merged.module.name.as_deref(), Some(name.as_str()));
        prop_assert_eq!(merged.output.file.as_str(), "metadata.json");
    }
}
