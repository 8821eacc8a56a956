// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs)]
/// spamdist - Alignment-free distance matrices from spaced-word matches
pub struct Args {
    /// path to a multi-FASTA file or a directory of FASTA files
    #[argh(option, short = 'i')]
    pub input: Option<String>,

    /// binary pattern of match (1) and don't-care (0) positions, e.g. 1101011
    #[argh(option, short = 'p')]
    pub pattern: Option<String>,

    /// use only the first k match positions of the pattern (default: all)
    #[argh(option, short = 'k')]
    pub weight: Option<usize>,

    /// output distance matrix file (default: stdout)
    #[argh(option, short = 'o')]
    pub output: Option<String>,

    /// output format: phylip, tsv, csv, nexus (default: phylip)
    #[argh(option, default = "String::from(\"phylip\")")]
    pub format: String,

    /// number of decimals written for each distance (default: 6)
    #[argh(option, default = "6")]
    pub precision: usize,

    /// distance estimator: jukes-cantor, p-distance (default: jukes-cantor)
    #[argh(option, default = "String::from(\"jukes-cantor\")")]
    pub estimator: String,

    /// number of threads (default: auto-detect)
    #[argh(option, short = 't')]
    pub threads: Option<usize>,

    /// include only sequences whose name matches the regex pattern
    #[argh(option)]
    pub include_sequences: Option<String>,

    /// exclude sequences whose name matches the regex pattern
    #[argh(option)]
    pub exclude_sequences: Option<String>,

    /// include only sequences listed in a file (one name per line)
    #[argh(option)]
    pub include_sequences_list: Option<String>,

    /// exclude sequences listed in a file (one name per line)
    #[argh(option)]
    pub exclude_sequences_list: Option<String>,

    /// write a JSON summary of the run to this file
    #[argh(option)]
    pub summary: Option<String>,

    /// list the available distance estimators and exit
    #[argh(switch)]
    pub list_estimators: bool,

    /// validate inputs and build word lists only (dry run)
    #[argh(switch)]
    pub dry_run: bool,

    /// hide progress bars and status messages (errors are still reported)
    #[argh(switch, short = 'q')]
    pub quiet: bool,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,
}
