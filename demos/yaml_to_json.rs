/// 读取 YAML 文件并输出 JSON
///
/// cargo run --example yaml_to_json -- [input.yaml]

use anyhow::Context;
use yamlstar::{init_logging, BindingConfig, YamlStar};

fn main() -> anyhow::Result<()> {
    let config = BindingConfig::load_or_default();
    init_logging(&config.logging);

    let yaml_file = std::env::args().nth(1).unwrap_or_else(|| "sample.yaml".to_string());
    println!("YAMLStar Example - Loading {} and outputting JSON\n", yaml_file);

    let yaml = std::fs::read_to_string(&yaml_file)
        .with_context(|| format!("failed to read {}", yaml_file))?;

    println!("Input YAML:");
    println!("{}", yaml);
    println!("\n---\n");

    let ys = YamlStar::with_config(&config)?;
    let data = ys.load_value(&yaml)?;

    println!("Output JSON:");
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}
