//! CLI driving [`ble_phy_core::Decoder`] over a raw sample file, and [`ook_burst::Burster`] over
//! a configured burst, printing whatever each one produces.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use byteorder::{LittleEndian, ReadBytesExt};
use clap::{Parser, ValueEnum};
use num_complex::Complex32;

use ble_phy_core::Decoder;
use ook_burst::{Burster, BursterConfig, Codebook};

#[derive(Parser, Debug)]
#[command(version, about = "BTLE advertising-channel decoder / OOK burst generator demo")]
struct Opt {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Decode a raw sample stream, printing each recovered PacketRecord.
    Decode {
        /// Input file of raw samples; reads stdin if omitted.
        #[arg(long)]
        input: Option<PathBuf>,

        /// How each input sample is encoded.
        #[arg(long, value_enum, default_value_t = Format::Int16)]
        format: Format,
    },
    /// Trigger one burst from the OOK codebook and print it as two-column float lines.
    Burst {
        #[arg(long)]
        mode: bool,

        #[arg(long, default_value = "A")]
        group: String,

        #[arg(long, default_value_t = 250e3)]
        rate: f64,

        #[arg(long, default_value_t = 1.0)]
        gain: f32,

        #[arg(long, default_value_t = 1)]
        repeat: usize,

        #[arg(long)]
        start_label: Option<String>,

        #[arg(long)]
        end_label: Option<String>,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Format {
    Int16,
    Float,
}

fn main() -> io::Result<()> {
    env_logger::init();
    let opt = Opt::parse();

    match opt.command {
        Command::Decode { input, format } => run_decode(input, format),
        Command::Burst {
            mode,
            group,
            rate,
            gain,
            repeat,
            start_label,
            end_label,
        } => run_burst(mode, group, rate, gain, repeat, start_label, end_label),
    }
}

fn open_input(input: Option<PathBuf>) -> io::Result<Box<dyn Read>> {
    match input {
        Some(path) => Ok(Box::new(File::open(path)?)),
        None => Ok(Box::new(io::stdin())),
    }
}

fn run_decode(input: Option<PathBuf>, format: Format) -> io::Result<()> {
    let mut reader = open_input(input)?;
    let mut decoder = Decoder::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    loop {
        let record = match format {
            Format::Int16 => match reader.read_i16::<LittleEndian>() {
                Ok(sample) => decoder.feed_one_i16(sample),
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e),
            },
            Format::Float => match reader.read_f32::<LittleEndian>() {
                Ok(sample) => decoder.feed_one_float(sample),
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e),
            },
        };
        if let Some(record) = record {
            writeln!(out, "{}", record)?;
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_burst(
    mode: bool,
    group: String,
    rate: f64,
    gain: f32,
    repeat: usize,
    start_label: Option<String>,
    end_label: Option<String>,
) -> io::Result<()> {
    let mut burster = Burster::new(
        Codebook::standard(),
        BursterConfig {
            mode,
            group,
            rate_sps: rate,
            gain,
            repeat,
            start_label,
            end_label,
        },
    );
    if let Err(e) = burster.trigger() {
        eprintln!("burst trigger rejected: {}", e);
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut buf = [Complex32::new(0.0, 0.0); 4096];
    loop {
        let (n, labels) = burster.work(&mut buf);
        for label in &labels {
            log::info!("label {:?} at offset {}", label.tag, label.offset);
        }
        for sample in &buf[..n] {
            writeln!(out, "{} {}", sample.re, sample.im)?;
        }
        if n == 0 && burster.is_idle() {
            break;
        }
    }
    Ok(())
}
