use std::io;

use anyhow::Context;
use clap::Args;
use pktax_core::{Residency, SlabTableKey};

use crate::cmd::{CategoryArg, Session};
use crate::report::render_slabs;

#[derive(Args, Debug)]
pub struct SlabsCommand {
    #[arg(short, long, value_enum, default_value_t = CategoryArg::Individual)]
    category: CategoryArg,

    /// Tax year (defaults to the configured year)
    #[arg(short, long)]
    year: Option<i32>,

    #[arg(long)]
    non_resident: bool,

    /// List every registered table instead of printing one
    #[arg(long)]
    list: bool,
}

impl SlabsCommand {
    pub fn exec(
        &self,
        session: &Session,
        out: &mut impl io::Write,
    ) -> anyhow::Result<()> {
        if self.list {
            for key in session.registry.keys() {
                writeln!(out, "{key}")?;
            }
            return Ok(());
        }

        let key = SlabTableKey::new(
            self.category.into(),
            Residency::from(!self.non_resident),
            self.year.unwrap_or(session.config.tax_year),
        );
        let slabs = session
            .registry
            .slabs_for(key.taxpayer_type, key.residency, key.tax_year)
            .context("cannot show slab table")?;

        write!(out, "{}", render_slabs(&key, slabs))?;
        Ok(())
    }
}
