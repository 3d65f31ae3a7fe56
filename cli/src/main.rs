use anyhow::{Context, anyhow};
use blob_recovery::{
    blob::{BLOB_LEN, Blob},
    fields::{FieldElement, PrimeFieldElement, fieldbls12_381_scalar::FieldBls12_381Scalar},
};
use clap::{Parser, ValueEnum};
use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::info;

/// Tools for EIP-4844 blobs
#[derive(Parser)]
enum Subcommand {
    /// Recover the coefficients of the polynomial a blob holds the evaluations of
    Recover {
        /// File containing the blob as hex, with an optional 0x prefix
        #[clap(long)]
        blob_file: PathBuf,

        /// How to print the coefficients
        #[arg(long, value_enum, default_value_t = OutputFormat::Hex)]
        format: OutputFormat,

        /// Write to this file instead of standard output
        #[clap(long)]
        output: Option<PathBuf>,
    },
    /// Evaluate a polynomial over the blob domain, producing a blob
    Encode {
        /// File containing a JSON array of at most 4096 hex coefficients, lowest degree first
        #[clap(long)]
        coefficients_file: PathBuf,

        /// Write to this file instead of standard output
        #[clap(long)]
        output: Option<PathBuf>,
    },
}

/// Output formats for recovered coefficients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One 0x-prefixed hex coefficient per line
    Hex,
    /// One decimal coefficient per line
    Decimal,
    /// A JSON array of hex strings
    Json,
}

fn main() -> Result<(), anyhow::Error> {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let subcommand = Subcommand::parse();
    match subcommand {
        Subcommand::Recover {
            blob_file,
            format,
            output,
        } => {
            let blob = Blob::from_file(&blob_file)?;
            let coefficients = blob.recover()?;
            info!(path = %blob_file.display(), "recovered blob");
            let formatted = format_coefficients(&coefficients, format)?;
            write_output(output.as_deref(), &formatted)?;
        }
        Subcommand::Encode {
            coefficients_file,
            output,
        } => {
            let data = fs::read_to_string(&coefficients_file).with_context(|| {
                format!(
                    "failed to read coefficients file {}",
                    coefficients_file.display()
                )
            })?;
            let coefficients = parse_coefficients(&data)?;
            let blob = Blob::from_coefficients(&coefficients)?;
            info!(path = %coefficients_file.display(), "encoded blob");
            write_output(output.as_deref(), &format!("{}\n", blob.to_hex()))?;
        }
    }
    Ok(())
}

/// Render coefficients in the requested format, ending with a newline.
fn format_coefficients(
    coefficients: &[FieldBls12_381Scalar],
    format: OutputFormat,
) -> Result<String, anyhow::Error> {
    match format {
        OutputFormat::Hex => Ok(coefficients
            .iter()
            .map(|coefficient| format!("0x{}\n", hex::encode(coefficient.to_bytes_be())))
            .collect()),
        OutputFormat::Decimal => Ok(coefficients
            .iter()
            .map(|coefficient| format!("{}\n", coefficient.to_biguint()))
            .collect()),
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string(coefficients).context("failed to serialize coefficients")?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Parse a JSON array of hex coefficients, padding with zero coefficients up to [`BLOB_LEN`].
fn parse_coefficients(data: &str) -> Result<Vec<FieldBls12_381Scalar>, anyhow::Error> {
    let mut coefficients: Vec<FieldBls12_381Scalar> =
        serde_json::from_str(data).context("failed to parse coefficients")?;
    if coefficients.len() > BLOB_LEN {
        return Err(anyhow!(
            "{} coefficients is too many for a blob, the maximum is {BLOB_LEN}",
            coefficients.len()
        ));
    }
    coefficients.resize(BLOB_LEN, FieldBls12_381Scalar::ZERO);
    Ok(coefficients)
}

fn write_output(path: Option<&Path>, contents: &str) -> Result<(), anyhow::Error> {
    match path {
        Some(path) => {
            let mut writer = BufWriter::new(
                File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?,
            );
            writer
                .write_all(contents.as_bytes())
                .and_then(|()| writer.flush())
                .with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(contents.as_bytes())
                .and_then(|()| stdout.flush())
                .context("failed to write to standard output")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Subcommand::command().debug_assert();
    }

    #[test]
    fn parse_arguments() {
        let subcommand = Subcommand::try_parse_from([
            "blob-recovery",
            "recover",
            "--blob-file",
            "blob.txt",
            "--format",
            "decimal",
        ])
        .unwrap();
        match subcommand {
            Subcommand::Recover {
                blob_file,
                format,
                output,
            } => {
                assert_eq!(blob_file, PathBuf::from("blob.txt"));
                assert_eq!(format, OutputFormat::Decimal);
                assert_eq!(output, None);
            }
            Subcommand::Encode { .. } => panic!("wrong subcommand"),
        }

        assert!(Subcommand::try_parse_from(["blob-recovery", "recover"]).is_err());
    }

    #[test]
    fn output_formats() {
        let coefficients = [FieldBls12_381Scalar::from(255), -FieldBls12_381Scalar::ONE];
        let zeros = "0".repeat(62);

        assert_eq!(
            format_coefficients(&coefficients, OutputFormat::Hex).unwrap(),
            format!(
                "0x{zeros}ff\n0x73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000000\n"
            )
        );
        assert_eq!(
            format_coefficients(&coefficients, OutputFormat::Decimal).unwrap(),
            "255\n52435875175126190479447740508185965837690552500527637822603658699938581184512\n"
        );
        assert_eq!(
            format_coefficients(&coefficients, OutputFormat::Json).unwrap(),
            format!(
                "[\"{zeros}ff\",\"73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000000\"]\n"
            )
        );
    }

    #[test]
    fn coefficients_are_padded() {
        let coefficients = parse_coefficients("[\"0x05\", \"07\"]");
        // Each coefficient must be a full 32 byte encoding.
        assert!(coefficients.is_err());

        let five = format!("{:064x}", 5);
        let coefficients = parse_coefficients(&format!("[\"0x{five}\", \"{five}\"]")).unwrap();
        assert_eq!(coefficients.len(), BLOB_LEN);
        assert_eq!(coefficients[0], FieldBls12_381Scalar::from(5));
        assert_eq!(coefficients[1], FieldBls12_381Scalar::from(5));
        assert!(coefficients[2..].iter().all(|c| *c == FieldBls12_381Scalar::ZERO));

        let too_many = serde_json::to_string(&vec![FieldBls12_381Scalar::ONE; BLOB_LEN + 1]).unwrap();
        assert!(parse_coefficients(&too_many).is_err());
    }

    #[test]
    fn encode_then_recover() {
        let coefficients = (0..BLOB_LEN as u64)
            .map(|i| FieldBls12_381Scalar::from(3 * i + 1))
            .collect::<Vec<_>>();
        let json = serde_json::to_string(&coefficients).unwrap();
        let blob = Blob::from_coefficients(&parse_coefficients(&json).unwrap()).unwrap();
        let recovered = Blob::from_hex(&blob.to_hex()).unwrap().recover().unwrap();
        assert_eq!(recovered, coefficients);
    }

    #[test]
    fn write_output_file() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("coefficients.txt");
        let coefficients = [FieldBls12_381Scalar::from(1), FieldBls12_381Scalar::from(2)];
        let formatted = format_coefficients(&coefficients, OutputFormat::Decimal).unwrap();

        write_output(Some(path.as_path()), &formatted).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "1\n2\n");

        // An existing file is replaced, not appended to.
        write_output(Some(path.as_path()), "3\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "3\n");

        let missing = directory.path().join("missing").join("coefficients.txt");
        let error = write_output(Some(missing.as_path()), &formatted).unwrap_err();
        assert!(format!("{error:#}").contains("failed to create"));
    }

    #[test]
    fn recover_blob_file_to_output_file() {
        let directory = tempfile::tempdir().unwrap();
        let blob_path = directory.path().join("blob.txt");
        let coefficients = (0..BLOB_LEN as u64)
            .map(|i| FieldBls12_381Scalar::from(i + 2))
            .collect::<Vec<_>>();
        let blob = Blob::from_coefficients(&coefficients).unwrap();
        fs::write(&blob_path, blob.to_hex()).unwrap();

        let output_path = directory.path().join("coefficients.json");
        let recovered = Blob::from_file(&blob_path).unwrap().recover().unwrap();
        write_output(
            Some(output_path.as_path()),
            &format_coefficients(&recovered, OutputFormat::Json).unwrap(),
        )
        .unwrap();

        let written: Vec<FieldBls12_381Scalar> =
            serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
        assert_eq!(written, coefficients);
    }
}
