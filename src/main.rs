use std::path::PathBuf;

use radprofile::{ProfileSource, Quantity, RenderSettings, SvgSurface, Style};
use regex::Regex;
use structopt::StructOpt;
use strum::IntoEnumIterator;

#[derive(Debug, StructOpt)]
#[structopt(name = "radprofile", about = "Extracting radial profiles from FITS binned tables")]
struct Opt {
    /// Path to the FITS profile table
    path: PathBuf,
    /// Columns regular expression filter
    #[structopt(short, long)]
    filter: Option<String>,
    /// Well-known quantity to extract (SUR_BRI or SUR_FLUX); defaults to
    /// every one present in the table
    #[structopt(short, long)]
    quantity: Vec<Quantity>,
    /// Write each extracted profile to a <quantity>.csv file
    #[structopt(long)]
    csv: bool,
    /// Plot each extracted profile to a <quantity>.svg file
    #[structopt(short, long)]
    plot: bool,
    /// Plot with linear instead of logarithmic axes
    #[structopt(long)]
    linear: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let source = ProfileSource::from_path(&opt.path)?;
    let filter = opt.filter.as_deref().map(Regex::new).transpose()?;
    source.summary(filter.as_ref());

    let quantities: Vec<Quantity> = if opt.quantity.is_empty() {
        Quantity::iter()
            .filter(|quantity| {
                source
                    .columns()
                    .iter()
                    .any(|(name, _)| *name == quantity.column())
            })
            .collect()
    } else {
        opt.quantity.clone()
    };

    let mut colors = colorous::TABLEAU10.iter().cycle();
    for quantity in quantities {
        let profile = source.quantity_profile(quantity)?;
        println!(
            "{}: {} bins [{}]",
            quantity,
            profile.len(),
            profile.val_unit
        );
        if opt.csv {
            profile.to_csv(format!("{}.csv", quantity))?;
        }
        if opt.plot {
            let color = colors.next().unwrap();
            let mut surface = SvgSurface::new(format!("{}.svg", quantity), (768, 512));
            profile.render(
                &mut surface,
                &RenderSettings {
                    log_scale: !opt.linear,
                    style: Style {
                        color: (color.r, color.g, color.b),
                        ..Default::default()
                    },
                },
            );
            surface.save()?;
        }
    }
    Ok(())
}
