use anyhow::{bail, Result};
use clap::Parser;
use env_logger::Env;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rmemviz::{MemoryAccess, TraceEvent, TraceWriter};
use std::collections::HashMap;

/// Generate a synthetic x86-style memory access trace
#[derive(Parser, Debug)]
#[command(name = "memviz-tracegen")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Number of trace rows to generate
    #[arg(short = 'n', long, default_value = "1000")]
    rows: usize,

    /// Distinct instruction sites; more than 42 exercises overflow colors
    #[arg(long, default_value = "48")]
    sites: usize,

    /// Output file; a `.br` suffix enables Brotli compression
    #[arg(short, long, default_value = "trace.jsonl")]
    out: String,

    /// Pointer size in bytes (4 or 8)
    #[arg(long, default_value = "8")]
    pointer_size: i64,

    /// Base of the simulated stack frame
    #[arg(long, default_value = "0x7ffe0000", value_parser = parse_u64)]
    frame_base: u64,

    /// Size of the simulated stack frame in bytes
    #[arg(long, default_value = "512")]
    frame_size: u64,

    /// Every Nth row is left out of the filtered trace (0 keeps all)
    #[arg(long, default_value = "3")]
    filter_every: usize,

    /// Random seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_u64(s: &str) -> Result<u64, String> {
    rmemviz::parse_address(s).map_err(|e| e.to_string())
}

/// Operand shape of one instruction site.
#[derive(Debug, Clone, Copy)]
enum SiteKind {
    Push,
    Pop,
    Load(usize),
    Store(usize),
    /// Register-only instruction, no memory access
    Alu,
}

#[derive(Debug, Clone)]
struct Site {
    ip: u64,
    kind: SiteKind,
    /// Frame offset of the memory operand (loads/stores)
    slot: u64,
    text: String,
}

fn width_keyword(width: usize) -> &'static str {
    match width {
        1 => "byte",
        2 => "word",
        4 => "dword",
        _ => "qword",
    }
}

fn register(width: usize) -> &'static str {
    match width {
        1 => "al",
        2 => "ax",
        4 => "eax",
        _ => "rax",
    }
}

fn build_sites(rng: &mut StdRng, cli: &Cli) -> Vec<Site> {
    const ALU: &[&str] = &["add eax, ebx", "xor ecx, ecx", "cmp edx, 0x10", "lea rsi, [rip+0x2f]", "nop"];

    (0..cli.sites)
        .map(|i| {
            let ip = 0x401000 + (i as u64) * 4;
            let kind = match rng.gen_range(0..10) {
                0 => SiteKind::Push,
                1 => SiteKind::Pop,
                2..=4 => SiteKind::Load([1, 2, 4, 8][rng.gen_range(0..4)]),
                5..=7 => SiteKind::Store([1, 2, 4, 8][rng.gen_range(0..4)]),
                _ => SiteKind::Alu,
            };
            let (slot, text) = match kind {
                SiteKind::Push => (0, "push rbp".to_string()),
                SiteKind::Pop => (0, "pop rbx".to_string()),
                SiteKind::Load(w) | SiteKind::Store(w) => {
                    let slots = (cli.frame_size / w as u64).max(1);
                    let slot = rng.gen_range(0..slots) * w as u64;
                    let operand = format!("{} ptr [rbp+{:#x}]", width_keyword(w), slot);
                    let text = match kind {
                        SiteKind::Load(_) => format!("mov {}, {}", register(w), operand),
                        _ => format!("mov {}, {}", operand, register(w)),
                    };
                    (slot, text)
                }
                SiteKind::Alu => (0, ALU[rng.gen_range(0..ALU.len())].to_string()),
            };
            Site { ip, kind, slot, text }
        })
        .collect()
}

/// Byte-level model of the frame so reads return what was last written.
struct Memory {
    bytes: HashMap<u64, u8>,
}

impl Memory {
    fn read(&mut self, rng: &mut StdRng, address: u64, width: usize) -> u64 {
        (0..width).fold(0u64, |value, i| {
            let byte = *self.bytes.entry(address + i as u64).or_insert_with(|| rng.gen());
            value | (u64::from(byte) << (8 * i))
        })
    }

    fn write(&mut self, address: u64, width: usize, value: u64) {
        for i in 0..width {
            self.bytes.insert(address + i as u64, (value >> (8 * i)) as u8);
        }
    }
}

fn random_value(rng: &mut StdRng, width: usize) -> u64 {
    if width >= 8 {
        rng.gen()
    } else {
        rng.gen_range(0..(1u64 << (8 * width)))
    }
}

fn generate_trace(writer: &mut TraceWriter, cli: &Cli) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(cli.seed);
    let sites = build_sites(&mut rng, cli);
    let ptr = cli.pointer_size as usize;
    let frame_top = cli.frame_base + cli.frame_size;
    let mut memory = Memory { bytes: HashMap::new() };
    // Stack pointer stays inside the frame; the top slot counts as already pushed
    let mut sp = frame_top - ptr as u64;

    writer.write_header(cli.pointer_size)?;

    for row_id in 0..cli.rows as u64 {
        let site = &sites[rng.gen_range(0..sites.len())];
        let mut event = TraceEvent::new(site.ip, row_id, site.text.clone());

        match site.kind {
            SiteKind::Push => {
                if sp >= cli.frame_base + ptr as u64 {
                    sp -= ptr as u64;
                }
                let value = random_value(&mut rng, ptr);
                memory.write(sp, ptr, value);
                event = event.with_access(MemoryAccess::write(sp, value));
            }
            SiteKind::Pop => {
                let value = memory.read(&mut rng, sp, ptr);
                event = event.with_access(MemoryAccess::read(sp, value));
                if sp + ptr as u64 <= frame_top - ptr as u64 {
                    sp += ptr as u64;
                }
            }
            SiteKind::Load(w) => {
                let address = cli.frame_base + site.slot;
                let value = memory.read(&mut rng, address, w);
                event = event.with_access(MemoryAccess::read(address, value));
            }
            SiteKind::Store(w) => {
                let address = cli.frame_base + site.slot;
                let value = random_value(&mut rng, w);
                memory.write(address, w, value);
                event = event.with_access(MemoryAccess::write(address, value));
            }
            SiteKind::Alu => {}
        }

        let in_filter = cli.filter_every == 0 || (row_id as usize + 1) % cli.filter_every != 0;
        writer.write_event(&event, in_filter)?;
    }

    writer.write_footer()?;
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    if cli.pointer_size != 4 && cli.pointer_size != 8 {
        bail!("Pointer size must be 4 or 8, got {}", cli.pointer_size);
    }
    if cli.frame_size < cli.pointer_size as u64 {
        bail!("Frame size must hold at least one pointer");
    }
    if cli.sites == 0 {
        bail!("At least one instruction site is required");
    }

    let mut writer = TraceWriter::new(&cli.out)?;
    generate_trace(&mut writer, &cli)?;

    info!("Wrote {} trace rows to {}", writer.event_count(), cli.out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(rows: usize) -> Cli {
        Cli::parse_from(["memviz-tracegen", "-n", &rows.to_string(), "--seed", "7"])
    }

    #[test]
    fn test_generated_trace_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gen.jsonl.br");
        let path = path.to_str().unwrap().to_string();

        let cli = cli(200);
        {
            let mut writer = TraceWriter::new(&path).unwrap();
            generate_trace(&mut writer, &cli).unwrap();
        }

        let trace = rmemviz::read_trace_file(&path).unwrap();
        assert_eq!(trace.len(), 200);
        assert_eq!(trace.pointer_size, 8);
        // every third row is outside the filtered trace
        assert_eq!(trace.filtered_trace().len(), 200 - 200 / 3);

        for event in trace.full_trace() {
            for access in &event.accesses {
                assert!(access.address >= cli.frame_base);
                assert!(access.address < cli.frame_base + cli.frame_size);
            }
        }
    }

    #[test]
    fn test_reads_see_previous_writes() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut memory = Memory { bytes: HashMap::new() };
        memory.write(0x100, 4, 0xDEAD_BEEF);
        assert_eq!(memory.read(&mut rng, 0x100, 4), 0xDEAD_BEEF);
        assert_eq!(memory.read(&mut rng, 0x102, 2), 0xDEAD);
    }

    #[test]
    fn test_site_text_has_operand_width() {
        let mut rng = StdRng::seed_from_u64(3);
        let cli = cli(1);
        for site in build_sites(&mut rng, &cli) {
            let expected = match site.kind {
                SiteKind::Load(w) | SiteKind::Store(w) => Some(w),
                SiteKind::Push | SiteKind::Pop => Some(8),
                SiteKind::Alu => None,
            };
            if let Some(w) = expected {
                assert_eq!(rmemviz::infer_width(&site.text, 8), Some(w), "{}", site.text);
            }
        }
    }
}
