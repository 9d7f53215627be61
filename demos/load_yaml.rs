/// YAMLStar 基本用法演示
///
/// cargo run --example load_yaml

use serde::Deserialize;
use yamlstar::{init_logging, BindingConfig, YamlStar};

#[derive(Deserialize, Debug)]
struct Config {
    host: String,
    port: u16,
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let config = BindingConfig::load_or_default();
    init_logging(&config.logging);

    let ys = YamlStar::with_config(&config)?;

    // 1. 动态值
    println!("1. Load to serde_json::Value");
    let data: serde_json::Value = ys.load("key: value")?;
    println!("   Result: {}", data);
    println!();

    // 2. 自定义类型
    println!("2. Load to typed struct");
    let server: Config = ys.load(
        r#"
host: localhost
port: 8080
debug: true
"#,
    )?;
    println!("   Config: {:?}", server);
    println!("   Server will run on {}:{}", server.host, server.port);
    println!("   Debug mode: {}", server.debug);
    println!();

    // 3. 序列
    println!("3. Load sequence");
    let items: Vec<String> = ys.load("- apple\n- banana\n- cherry")?;
    println!("   Items: {:?}", items);
    println!();

    // 4. 多文档
    println!("4. Load multiple documents");
    let docs: Vec<String> = ys.load_all("---\nfirst\n---\nsecond\n---\nthird")?;
    println!("   Documents: {:?}", docs);
    println!();

    // 5. 版本
    println!("5. Library version");
    println!("   YAMLStar version: {}", ys.version()?);
    if let Some(path) = ys.library_path() {
        println!("   Library: {}", path.display());
    }

    ys.close()?;
    Ok(())
}
