use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use xmlbind::access::typed::{
    add_child, child, element_to_string, get_attr_as, get_text_as, num_children, obtain_child,
    set_attr_as, set_text_as,
};
use xmlbind::access::{ValueType, XmlScalar};
use xmlbind::config::Config;
use xmlbind::document::node::XmlElement;
use xmlbind::file::{load_xml_file, save_xml_file};

/// xmlbind - read and write XML elements by path
#[derive(Parser)]
#[command(name = "xmlbind")]
#[command(version)]
#[command(about = "Read and write XML elements by path", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the text or an attribute of an element as a typed value
    Get {
        file: PathBuf,
        /// Element path, e.g. `window/1/title`
        path: String,
        /// Read this attribute instead of the element text
        #[arg(short, long)]
        attr: Option<String>,
        /// bool, byte, int, uint, float, double or string
        #[arg(short = 't', long = "type", default_value = "string")]
        value_type: ValueType,
    },
    /// Write a typed value, creating the element if needed
    Set {
        file: PathBuf,
        path: String,
        value: String,
        #[arg(short, long)]
        attr: Option<String>,
        #[arg(short = 't', long = "type", default_value = "string")]
        value_type: ValueType,
    },
    /// Insert a new element among its same-named siblings
    Add {
        file: PathBuf,
        path: String,
        /// Position among same-named siblings
        #[arg(short, long, default_value_t = 0)]
        index: usize,
    },
    /// Count the child elements of an element
    Count {
        file: PathBuf,
        path: Option<String>,
        /// Count only children with this tag name
        #[arg(short, long, default_value = "")]
        name: String,
    },
    /// Print an element's name and attributes
    Show { file: PathBuf, path: Option<String> },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("XMLBIND_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(Cli::parse()) {
        tracing::error!("{err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Get {
            file,
            path,
            attr,
            value_type,
        } => {
            let doc = load_xml_file(&file)?;
            let element = child(doc.root(), &path, 0);
            println!("{}", read_value(element, attr.as_deref(), value_type));
        }
        Command::Set {
            file,
            path,
            value,
            attr,
            value_type,
        } => {
            let mut doc = load_xml_file(&file)?;
            let element = obtain_child(Some(doc.root_mut()), &path, 0)
                .ok_or_else(|| anyhow!("Cannot create element at path '{}'", path))?;
            write_value(element, attr.as_deref(), value_type, &value)?;
            save_xml_file(&file, &doc, &Config::load())?;
        }
        Command::Add { file, path, index } => {
            let mut doc = load_xml_file(&file)?;
            add_child(Some(doc.root_mut()), &path, index)
                .ok_or_else(|| anyhow!("Cannot add element at path '{}'", path))?;
            save_xml_file(&file, &doc, &Config::load())?;
        }
        Command::Count { file, path, name } => {
            let doc = load_xml_file(&file)?;
            let path = path.unwrap_or_default();
            println!("{}", num_children(Some(doc.root()), &path, &name));
        }
        Command::Show { file, path } => {
            let doc = load_xml_file(&file)?;
            let path = path.unwrap_or_default();
            let element = child(doc.root(), &path, 0)
                .with_context(|| format!("No element at '{}'", path))?;
            print!("{}", element_to_string(Some(element), "  "));
        }
    }
    Ok(())
}

fn read_value(element: Option<&XmlElement>, attr: Option<&str>, value_type: ValueType) -> String {
    match value_type {
        ValueType::Bool => read::<bool>(element, attr).format(),
        ValueType::Byte => read::<u8>(element, attr).format(),
        ValueType::Int => read::<i32>(element, attr).format(),
        ValueType::UInt => read::<u32>(element, attr).format(),
        ValueType::Float => read::<f32>(element, attr).format(),
        ValueType::Double => read::<f64>(element, attr).format(),
        ValueType::String | ValueType::Undefined => read::<String>(element, attr),
    }
}

fn read<T: XmlScalar + Default>(element: Option<&XmlElement>, attr: Option<&str>) -> T {
    match attr {
        Some(name) => get_attr_as(element, name, T::default()),
        None => get_text_as(element, T::default()),
    }
}

fn write_value(
    element: &mut XmlElement,
    attr: Option<&str>,
    value_type: ValueType,
    text: &str,
) -> Result<()> {
    match value_type {
        ValueType::Bool => write::<bool>(element, attr, text),
        ValueType::Byte => write::<u8>(element, attr, text),
        ValueType::Int => write::<i32>(element, attr, text),
        ValueType::UInt => write::<u32>(element, attr, text),
        ValueType::Float => write::<f32>(element, attr, text),
        ValueType::Double => write::<f64>(element, attr, text),
        ValueType::String | ValueType::Undefined => write::<String>(element, attr, text),
    }
}

fn write<T: XmlScalar>(element: &mut XmlElement, attr: Option<&str>, text: &str) -> Result<()> {
    let value = T::parse(text).ok_or_else(|| anyhow!("'{}' is not a valid {}", text, T::TYPE))?;
    match attr {
        Some(name) => set_attr_as(Some(element), name, value),
        None => set_text_as(Some(element), value),
    }
    Ok(())
}
