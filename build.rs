use std::env;

const FFMPEG_ENV: &[&str] = &["FFMPEG_DIR", "FFMPEG_PKG_CONFIG_PATH", "PKG_CONFIG_PATH"];

fn main() {
    for name in FFMPEG_ENV {
        println!("cargo:rerun-if-env-changed={name}");
    }

    // pkg-config finds FFmpeg on Unix; Windows needs an explicit location.
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("windows")
        && env::var_os("FFMPEG_DIR").is_none()
    {
        println!(
            "cargo:warning=sceneslice decodes video with FFmpeg. Set FFMPEG_DIR to an FFmpeg install (include/ and lib/) before building on Windows."
        );
    }
}
