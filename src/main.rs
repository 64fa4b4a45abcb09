use std::fs;
use std::io::{self, Read};

use log::{info, warn};

use rolling_median::confman::ConfMan;
use rolling_median::notify::{Notifier, NotifierConfig};
use rolling_median::{logger, progbase, Error};

fn parse_amount(token: &str, position: usize) -> Result<i64, Error> {
    token.parse().map_err(|_| Error::Parse {
        token: token.to_string(),
        position,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opts = progbase::try_init().unwrap_or_else(|e| e.exit());
    if opts.version {
        progbase::print_version();
        return Ok(());
    }
    let _ = logger::init_logger();

    if opts.print_schema {
        println!("{}", ConfMan::<NotifierConfig>::schema()?);
        return Ok(());
    }

    let mut conf = match &opts.config {
        Some(path) => ConfMan::<NotifierConfig>::from_file("notifier", path)?,
        None => ConfMan::<NotifierConfig>::new("notifier")?,
    };
    if let Some(window) = opts.window {
        conf.value_mut().window = window;
    }
    if let Some(factor) = opts.factor {
        conf.value_mut().factor = factor;
    }
    info!(
        "window {} factor {} ({})",
        conf.value().window,
        conf.value().factor,
        conf.file().display()
    );

    let input = match &opts.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let mut notifier = Notifier::<i64>::new(conf.value())?;
    let mut count = 0;
    for (position, token) in input.split_whitespace().enumerate() {
        let amount = parse_amount(token, position)?;
        if let Some(notification) = notifier.observe(amount)? {
            warn!(
                "sample {} = {} reached {} x median {}",
                notification.index,
                notification.amount,
                conf.value().factor,
                notification.median
            );
            println!(
                "{} {} {}",
                notification.index, notification.amount, notification.median
            );
            count += 1;
        }
    }

    info!("{} notifications in {} samples", count, notifier.seen());
    println!("{}", count);
    Ok(())
}
