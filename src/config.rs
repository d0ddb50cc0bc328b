// Product identity generated by build.rs from config.toml.
include!(concat!(env!("OUT_DIR"), "/gantry_config.rs"));
