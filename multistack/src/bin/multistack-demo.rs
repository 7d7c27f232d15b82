use clap::Parser;
use log::*;
use multistack::MultiStack;

#[derive(Parser, Debug)]
#[command(version, about = "Walk a MultiStack through its operations")]
struct Args {
    /// Total number of slots in the store.
    #[arg(short, long, default_value_t = 15)]
    total_capacity: usize,
    /// Number of lanes the slots are split into.
    #[arg(short, long, default_value_t = 3)]
    lanes: usize,
    /// Elements pushed onto every lane in the first round.
    #[arg(short, long, default_value_t = 3)]
    fill: u32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let mut stack = MultiStack::new(args.total_capacity, args.lanes)?;
    let lanes = stack.num_lanes();

    println!("Initial state:\n{stack}");

    for i in 0..args.fill {
        for lane in 0..lanes {
            stack.push(lane, i * 10 + lane as u32 + 1)?;
        }
    }

    println!("After pushing {} per lane:\n{stack}", args.fill);

    {
        let mut first = stack.lane_mut(0)?;
        first.push(100)?;
        println!("Top of lane 0: {}", first.peek()?);
    }

    if let Ok(mut second) = stack.lane_mut(1) {
        second.push(200)?;
        println!("Size of lane 1: {}", second.len());
    }

    let last = stack.lane(lanes - 1)?;
    println!("Capacity of lane {}: {}", last.index(), last.capacity());

    println!();
    for _ in 0..2 {
        match stack.pop(0) {
            Ok(v) => println!("Pop from lane 0: {v}"),
            Err(e) => warn!("Pop from lane 0 failed: {e}"),
        }
    }

    println!("{stack}");

    let mut pushed = 0;
    while !stack.is_lane_full(0)? {
        stack.push(0, 100 + pushed)?;
        pushed += 1;
    }

    println!("Lane 0 filled with {pushed} more:\n{stack}");
    stack.repack()?;
    println!("After repack:\n{stack}");

    let all = stack
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    println!("All elements: {all}");

    let mut copy = stack.clone();
    println!("copy == original: {}", copy == stack);

    copy.push(0, 9999)?;
    println!("copy == original after push: {}", copy == stack);

    loop {
        if let Err(e) = copy.push(lanes - 1, 0) {
            println!("Filling the copy stopped: {e}");
            break;
        }
    }

    let moved = copy.take();
    println!(
        "Taken store has {} lanes, source has {}",
        moved.num_lanes(),
        copy.num_lanes()
    );

    Ok(())
}
