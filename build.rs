fn main() {
    // cfg.toml が無い場合は toml_cfg の #[default] 値が使われる
    println!("cargo:rerun-if-changed=cfg.toml");

    #[cfg(feature = "esp")]
    embuild::espidf::sysenv::output();
}
