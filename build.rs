use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Bits per bitmap word. The page bitmap is an array of `u64`.
const WORD_BITS: u64 = 64;

#[derive(Deserialize, Default)]
struct ConfigSection {
    page_size: Option<u64>,
    max_address_32: Option<u64>,
    max_address_64: Option<u64>,
}

#[derive(Deserialize, Default)]
struct Config {
    #[serde(default)]
    config: ConfigSection,
}

struct ResolvedConfig {
    page_size: u64,
    page_shift: u32,
    max_address: u64,
}

fn resolve_config(cfg: &ConfigSection, pointer_width: u32) -> ResolvedConfig {
    let page_size = cfg.page_size.unwrap_or(65536);
    assert!(
        page_size > 0 && page_size.is_power_of_two(),
        "page_size ({}) must be a power of 2",
        page_size
    );
    assert!(
        page_size >= 4096,
        "page_size ({}) must be >= 4096",
        page_size
    );

    let max_address = match pointer_width {
        32 => {
            let max = cfg.max_address_32.unwrap_or(0x8000_0000);
            // Pointer differences must not wrap on 32-bit targets.
            assert!(
                max <= 0x8000_0000,
                "max_address_32 ({:#x}) must be <= 2 GiB",
                max
            );
            max
        }
        64 => cfg.max_address_64.unwrap_or(0x2_0000_0000),
        other => panic!("unsupported target pointer width {}", other),
    };

    assert!(max_address > 0, "max_address must be > 0");
    assert!(
        max_address % (page_size * WORD_BITS) == 0,
        "max_address ({:#x}) must be a multiple of page_size * {} ({:#x})",
        max_address,
        WORD_BITS,
        page_size * WORD_BITS
    );

    ResolvedConfig {
        page_size,
        page_shift: page_size.trailing_zeros(),
        max_address,
    }
}

fn default_config_path() -> String {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    format!("{}/linmap.toml", manifest_dir)
}

fn generate_config(cfg: &ResolvedConfig, out_path: &Path) {
    let num_pages = cfg.max_address / cfg.page_size;
    let code = format!(
        "// Auto-generated by build.rs. Do not edit.\n\n\
         pub const PAGE_SHIFT: usize = {};\n\
         pub const PAGE_SIZE: usize = {};\n\
         pub const PAGE_MASK: usize = {};\n\
         pub const MAX_ADDRESS: usize = {:#x};\n\
         pub const NUM_PAGES: usize = {};\n\
         pub const BITMAP_WORDS: usize = {};\n",
        cfg.page_shift,
        cfg.page_size,
        cfg.page_size - 1,
        cfg.max_address,
        num_pages,
        num_pages / WORD_BITS,
    );
    fs::write(out_path, code).expect("failed to write config_gen.rs");
}

fn main() {
    println!("cargo:rerun-if-env-changed=LINMAP_CONFIG");

    let out_dir = env::var("OUT_DIR").unwrap();
    let pointer_width: u32 = env::var("CARGO_CFG_TARGET_POINTER_WIDTH")
        .expect("CARGO_CFG_TARGET_POINTER_WIDTH not set")
        .parse()
        .expect("invalid target pointer width");

    let config_path = env::var("LINMAP_CONFIG").unwrap_or_else(|_| default_config_path());
    println!("cargo:rerun-if-changed={}", config_path);
    let content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", config_path, e));

    let config: Config = toml::from_str(&content).expect("failed to parse TOML config");
    let resolved = resolve_config(&config.config, pointer_width);

    generate_config(&resolved, &Path::new(&out_dir).join("config_gen.rs"));
}
