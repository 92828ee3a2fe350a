use clap::ValueEnum;
use spotlight_mcp::EngineKind;

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum EngineFlag {
    #[value(alias = "spotlight")]
    Mdfind,
    #[value(alias = "fs")]
    Filesystem,
}

impl EngineFlag {
    pub(crate) const fn as_domain(self) -> EngineKind {
        match self {
            EngineFlag::Mdfind => EngineKind::Mdfind,
            EngineFlag::Filesystem => EngineKind::Filesystem,
        }
    }
}
