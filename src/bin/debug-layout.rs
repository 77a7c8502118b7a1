/// Diagnostic tool to verify items → layout → draw commands without a window
///
/// Usage: debug-layout [WIDTHxHEIGHT] [--commands] [name:qty:percentage ...]
use anyhow::{bail, Context};
use squaremap_rs::data::{parse_item, sample_items, Item, ItemId};
use squaremap_rs::layout::{compute_layout, Placement};
use squaremap_rs::render::shape::{render_placements, ShapeStyle};
use squaremap_rs::render::surface::RecordingSurface;

struct Args {
    width: f64,
    height: f64,
    dump_commands: bool,
    items: Vec<Item>,
}

fn parse_size(arg: &str) -> Option<(f64, f64)> {
    let (w, h) = arg.split_once(['x', 'X'])?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        width: 1000.0,
        height: 800.0,
        dump_commands: false,
        items: Vec::new(),
    };

    for (i, arg) in std::env::args().skip(1).enumerate() {
        if arg == "--commands" {
            args.dump_commands = true;
        } else if i == 0 && !arg.contains(':') {
            let (w, h) = parse_size(&arg).with_context(|| format!("bad size '{}', expected WIDTHxHEIGHT", arg))?;
            args.width = w;
            args.height = h;
        } else {
            let id = ItemId(args.items.len() as u32);
            match parse_item(id, &arg) {
                Some(item) => args.items.push(item),
                None => bail!("bad item '{}', expected name:qty:percentage", arg),
            }
        }
    }

    if args.items.is_empty() {
        args.items = sample_items();
    }
    Ok(args)
}

fn overlaps(a: &Placement, b: &Placement) -> bool {
    const EPS: f64 = 1e-6;
    a.x + EPS < b.x + b.w && b.x + EPS < a.x + a.w && a.y + EPS < b.y + b.h && b.y + EPS < a.y + a.h
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("squaremap_rs=debug".parse()?),
        )
        .init();

    let args = parse_args()?;

    println!("=== DIAGNOSTIC: Items → Layout Pipeline ===");
    println!("Bounds: {}x{}", args.width, args.height);

    let total: f64 = args.items.iter().map(|item| item.qty).sum();
    println!("\n[1] Input: {} items, total weight {}", args.items.len(), total);
    for item in &args.items {
        println!(
            "    {} '{}' qty={} change={}%",
            item.id, item.name, item.qty, item.percentage
        );
    }

    let layout = compute_layout(&args.items, args.width, args.height)?;

    println!("\n[2] Placements:");
    for p in &layout.placements {
        let share = p.area() / (args.width * args.height) * 100.0;
        println!(
            "    {} '{}' at ({:.2}, {:.2}) size {:.2}x{:.2} area={:.1}%",
            p.id, p.name, p.x, p.y, p.w, p.h, share
        );
    }

    let covered: f64 = layout.placements.iter().map(Placement::area).sum();
    let bounds_area = args.width * args.height;
    println!(
        "\n[3] Coverage: {:.2} of {:.2} ({:.4}%)",
        covered,
        bounds_area,
        covered / bounds_area * 100.0
    );

    let mut overlap_count = 0;
    for (i, a) in layout.placements.iter().enumerate() {
        for b in &layout.placements[i + 1..] {
            if overlaps(a, b) {
                println!("    WARNING: {} overlaps {}", a.id, b.id);
                overlap_count += 1;
            }
        }
    }
    println!("    Overlapping pairs: {}", overlap_count);

    let mut surface = RecordingSurface::new();
    render_placements(&mut surface, &layout.placements, &ShapeStyle::default());
    println!(
        "\n[4] Render: {} commands, {} fills, labels {:?}",
        surface.commands.len(),
        surface.fill_count(),
        surface.texts()
    );

    if args.dump_commands {
        for cmd in &surface.commands {
            println!("    {:?}", cmd);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_argument() {
        assert_eq!(parse_size("1000x800"), Some((1000.0, 800.0)));
        assert_eq!(parse_size("640X480.5"), Some((640.0, 480.5)));
        assert_eq!(parse_size("Pepsi"), None);
    }
}
