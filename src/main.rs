#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::process::exit;

use clap::ArgMatches;
use lepconv::errors::Result;
use lepconv::scene::{NodeIdx, Scene};
use lepconv::{lep, logger, translator, version};

fn main() {
    let app = clap_app!(lepconv =>
        (@setting SubcommandRequiredElseHelp)
        (version: version::VERSION)
        (about: "LEP/BVH mocap translator")
        (@arg verbose: -v --verbose +global "show debug output")
        (@subcommand info =>
            (about: "Show the skeleton and motion in an LEP file")
            (alias: "i")
            (@arg INPUT: +required "LEP file")
            (@arg strict: --strict "fail on the first malformed line instead of continuing")
        )
        (@subcommand check =>
            (about: "Check whether a file is recognized as LEP")
            (alias: "c")
            (@arg INPUT: +required "candidate file")
        )
    );
    let matches = app.get_matches();

    let level = match matches.is_present("verbose") {
        true => log::Level::Debug,
        false => log::Level::Info,
    };
    logger::init(level);

    let res = match matches.subcommand() {
        ("info", Some(m)) => info(m),
        ("check", Some(m)) => check(m),
        _ => unreachable!(),
    };
    if let Err(e) = res {
        error!("{}", e);
        exit(1);
    }
}

fn info(matches: &ArgMatches) -> Result<()> {
    let path = Path::new(matches.value_of_os("INPUT").unwrap());
    let opts = lep::ReadOptions {
        strict: matches.is_present("strict"),
        ..Default::default()
    };

    let mut scene = Scene::new();
    let summary = lep::read_file(path, &mut scene, &opts)?;

    let plural = |x: usize| if x != 1 { "s" } else { "" };
    println!("Got {} joint{}, {} channel{}, {} frame{}.",
        summary.num_joints, plural(summary.num_joints),
        summary.num_channels, plural(summary.num_channels),
        summary.num_frames, plural(summary.num_frames as usize),
    );
    if let Some(n) = summary.declared_frames {
        println!("Declared frames: {}", n);
    }
    if let Some(t) = summary.frame_time {
        println!("Declared frame time: {}", t);
    }

    if let Some(root) = summary.root {
        println!();
        print_joint(&scene, root, 0);
    }
    Ok(())
}

fn print_joint(scene: &Scene, idx: NodeIdx, depth: usize) {
    let node = scene.node(idx);
    let t = node.translation;
    let channels: Vec<String> = node.channels.iter().map(|c| c.to_string()).collect();
    print!("{:indent$}{} ({} {} {})", "", node.name, t.x, t.y, t.z, indent = depth * 2);
    if !channels.is_empty() {
        print!(" [{}]", channels.join(" "));
    }
    if node.tip_offset.is_some() {
        print!(" (tip)");
    }
    println!();
    for &child in scene.children(idx) {
        print_joint(scene, child, depth + 1);
    }
}

fn check(matches: &ArgMatches) -> Result<()> {
    let path = matches.value_of("INPUT").unwrap();

    let mut registry = translator::Registry::default();
    registry.register(translator::lep_translator())?;

    let mut head = vec![];
    File::open(Path::new(path))?.take(64).read_to_end(&mut head)?;

    match registry.identify(&head) {
        Some(t) => {
            println!("{}: recognized as {} (*.{})", path, t.name, t.default_extension);
            Ok(())
        }
        None => {
            println!("{}: not recognized", path);
            exit(1);
        }
    }
}
