use std::{env, fs, path::PathBuf};

// Place settings.json next to the built binary so `agency-board` runs from
// the target directory without flags.
fn main() {
    println!("cargo:rerun-if-changed=settings.json");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let profile_dir = out_dir.ancestors().nth(3).unwrap();

    fs::copy("settings.json", profile_dir.join("settings.json")).expect("Failed to copy settings.json");
}
