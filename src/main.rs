//! Host-side helper: `cargo run` builds the WASM bundle into `static/pkg`,
//! serves `static/` over HTTP, and (if asked) exposes it via ngrok.

#[cfg(not(target_arch = "wasm32"))]
mod dev {
    use std::path::PathBuf;
    use std::process::{Command, Stdio};
    use std::{thread, time::Duration};

    use anyhow::{bail, Context, Result};
    use clap::Parser;

    #[derive(Parser, Debug, Clone)]
    #[command(name = "raymarch-dev")]
    #[command(about = "Build and serve the raymarch canvas locally", long_about = None)]
    pub struct Cli {
        /// Port for the static file server
        #[arg(long, default_value_t = 8000)]
        pub port: u16,

        /// Directory served as the site root
        #[arg(long, default_value = "static")]
        pub dir: PathBuf,

        /// Serve whatever is already in the site directory
        #[arg(long = "no-build", default_value = "false")]
        pub no_build: bool,

        /// Open an ngrok tunnel to the server
        #[arg(long, default_value = "false")]
        pub tunnel: bool,
    }

    fn build_wasm(dir: &std::path::Path) -> Result<()> {
        log::info!("building WASM pkg");
        let out_dir = dir.join("pkg");
        let status = Command::new("wasm-pack")
            .args(["build", "--release", "--target", "web", "--out-dir"])
            .arg(&out_dir)
            .status();

        match status {
            Ok(st) if st.success() => Ok(()),
            Ok(st) => bail!("wasm-pack exited with {st}"),
            Err(_) => {
                log::warn!(
                    "wasm-pack not found in PATH; serving possibly stale artifacts \
                     (https://rustwasm.github.io/wasm-pack/)"
                );
                Ok(())
            }
        }
    }

    pub fn run(cli: Cli) -> Result<()> {
        if !cli.no_build {
            build_wasm(&cli.dir)?;
        }

        log::info!("serving {} at http://127.0.0.1:{}", cli.dir.display(), cli.port);
        let mut server = Command::new("python3")
            .args(["-m", "http.server"])
            .arg(cli.port.to_string())
            .arg("--directory")
            .arg(&cli.dir)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("failed to start http server")?;

        if cli.tunnel {
            match Command::new("ngrok")
                .args(["http", &cli.port.to_string()])
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .spawn()
            {
                Ok(_) => log::info!("ngrok tunnel starting"),
                Err(_) => log::warn!("ngrok not found; install it to expose the site"),
            }
        }

        loop {
            if let Some(status) = server.try_wait().context("http server status")? {
                bail!("http server exited with {status}");
            }
            thread::sleep(Duration::from_secs(1));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    raymarch_wasm::logging::init_logging(log::LevelFilter::Info);
    dev::run(dev::Cli::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
