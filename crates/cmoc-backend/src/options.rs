//! Option string composition.
//!
//! The device compiler takes two free-form strings: the public `-options`
//! and the `-internal_options`. Its own parser is order-sensitive for
//! repeated flags, so the order below is part of the contract. Nothing is
//! escaped here; the caller supplies well-formed option text.

use crate::config::BridgeConfig;

/// Enables the vector compute codegen path in the device compiler.
pub const VC_CODEGEN_FLAG: &str = "-vc-codegen";
/// Appended to the internal options when pass timing is requested.
pub const TIME_REPORT_FLAG: &str = "-ftime-report";

/// Compose the public compile options.
///
/// Always starts with [`VC_CODEGEN_FLAG`]; a non-empty
/// `vc_api_options` override is appended after a single space.
pub fn compose_options(config: &BridgeConfig) -> String {
    let mut options = String::from(VC_CODEGEN_FLAG);
    if let Some(aux) = config.vc_api_options.as_deref().filter(|s| !s.is_empty()) {
        options.push(' ');
        options.push_str(aux);
    }
    options
}

/// Compose the internal options.
///
/// Flags are emitted in this order, each preceded by a space:
/// binary format, backend options, target features, the
/// `internal_options` override, time report. Absent inputs emit nothing.
pub fn compose_internal_options(
    config: &BridgeConfig,
    binary_format: &str,
    backend_options: &[String],
    features: &str,
    time_passes: bool,
) -> String {
    let mut internal = String::new();
    internal.push_str(" -binary-format=");
    internal.push_str(binary_format);

    if !backend_options.is_empty() {
        internal.push_str(" -llvm-options='");
        internal.push_str(&backend_options.join(" "));
        internal.push('\'');
    }

    if !features.is_empty() {
        internal.push_str(" -target-features=");
        internal.push_str(features);
    }

    if let Some(env) = config.internal_options.as_deref() {
        internal.push(' ');
        internal.push_str(env);
    }

    if time_passes {
        internal.push(' ');
        internal.push_str(TIME_REPORT_FLAG);
    }

    internal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn options_without_override() {
        assert_eq!(compose_options(&BridgeConfig::default()), "-vc-codegen");
    }

    #[test]
    fn options_with_override() {
        let cfg = BridgeConfig {
            vc_api_options: Some("--foo".into()),
            ..Default::default()
        };
        assert_eq!(compose_options(&cfg), "-vc-codegen --foo");
    }

    #[test]
    fn empty_override_is_ignored() {
        let cfg = BridgeConfig {
            vc_api_options: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(compose_options(&cfg), "-vc-codegen");
    }

    #[test]
    fn internal_minimal() {
        let s = compose_internal_options(&BridgeConfig::default(), "patch_tokens", &[], "", false);
        assert_eq!(s, " -binary-format=patch_tokens");
    }

    #[test]
    fn internal_all_inputs() {
        let s = compose_internal_options(
            &BridgeConfig::default(),
            "patch_tokens",
            &opts(&["-O2", "-g"]),
            "avx512",
            true,
        );
        assert_eq!(
            s,
            " -binary-format=patch_tokens -llvm-options='-O2 -g' -target-features=avx512 -ftime-report"
        );
    }

    #[test]
    fn internal_override_sits_before_time_report() {
        let cfg = BridgeConfig {
            internal_options: Some("-dump-isa".into()),
            ..Default::default()
        };
        let s = compose_internal_options(&cfg, "ze", &opts(&["-x"]), "+f", true);
        assert_eq!(
            s,
            " -binary-format=ze -llvm-options='-x' -target-features=+f -dump-isa -ftime-report"
        );
    }

    #[test]
    fn every_combination_keeps_order() {
        let cfg_env = BridgeConfig {
            internal_options: Some("-env".into()),
            ..Default::default()
        };
        let cfg_none = BridgeConfig::default();
        let backend = opts(&["-a"]);

        for mask in 0u8..16 {
            let with_backend = mask & 1 != 0;
            let with_features = mask & 2 != 0;
            let with_env = mask & 4 != 0;
            let time = mask & 8 != 0;

            let s = compose_internal_options(
                if with_env { &cfg_env } else { &cfg_none },
                "cm",
                if with_backend { backend.as_slice() } else { &[] },
                if with_features { "feat" } else { "" },
                time,
            );

            let mut expected = vec!["-binary-format=cm"];
            if with_backend {
                expected.push("-llvm-options='-a'");
            }
            if with_features {
                expected.push("-target-features=feat");
            }
            if with_env {
                expected.push("-env");
            }
            if time {
                expected.push("-ftime-report");
            }
            assert_eq!(s, format!(" {}", expected.join(" ")), "mask {mask:#06b}");
        }
    }

    #[test]
    fn values_are_not_escaped() {
        let s = compose_internal_options(
            &BridgeConfig::default(),
            "cm",
            &opts(&["-opt='x y'"]),
            "",
            false,
        );
        assert_eq!(s, " -binary-format=cm -llvm-options='-opt='x y''");
    }
}
