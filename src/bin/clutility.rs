//! clutility demo
//!
//! Defines the classic Num / Doubler hierarchy and prints what each
//! instance observes. Set `RUST_LOG=clutility=trace` to watch classes being
//! defined and instances constructed.

use clutility::{ClassError, Context, Exception, Function, Members, Value};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("definition failed: {0}")]
    Class(#[from] ClassError),
    #[error("{0}")]
    Call(#[from] Exception),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn arg(args: &[Value], idx: usize) -> Value {
    args.get(idx).cloned().unwrap_or_default()
}

fn run() -> Result<(), DemoError> {
    let ctx = Context::new();

    let num = ctx.classify(
        None,
        Members::new()
            .field("state", "shared")
            .initializer(Function::from_signature("function(initial)", |this, args| {
                this.set("value", arg(args, 0))?;
                this.set("state", "private")?;
                Ok(Value::Undefined)
            }))
            .method(
                "set",
                Function::from_signature("function(x)", |this, args| {
                    this.set("value", arg(args, 0))?;
                    Ok(Value::Undefined)
                }),
            )
            .method(
                "get",
                Function::from_signature("function()", |this, _| Ok(this.get("value"))),
            ),
    )?;

    let doubler = ctx.classify(
        Some(&num),
        Members::new()
            .initializer(Function::from_signature("function($super, num)", |_, args| {
                let doubled = Value::from(arg(args, 1).to_number() * 2.0);
                arg(args, 0).call(&Value::Undefined, &[doubled])?;
                Ok(Value::Undefined)
            }))
            .method(
                "set",
                Function::from_signature("function($super, value)", |_, args| {
                    let doubled = Value::from(arg(args, 1).to_number() * 2.0);
                    arg(args, 0).call(&Value::Undefined, &[doubled])
                }),
            ),
    )?;

    let lazy_doubler = ctx.classify(
        Some(&num),
        Members::new()
            .initializer(Function::from_signature("function()", |_, _| Ok(Value::Undefined)))
            .method(
                "get",
                Function::from_signature("function($super)", |_, args| {
                    let base = arg(args, 0).call(&Value::Undefined, &[])?;
                    Ok(Value::from(base.to_number() * 2.0))
                }),
            ),
    )?;

    let n = num.construct(&[Value::from(2)])?;
    println!("num:      state={} get()={}", n.get("state"), n.invoke("get", &[])?);

    let d = doubler.construct(&[Value::from(3)])?;
    println!("doubler:  state={} get()={}", d.get("state"), d.invoke("get", &[])?);
    d.invoke("set", &[Value::from(5)])?;
    println!("          after set(5) get()={}", d.invoke("get", &[])?);

    let l = lazy_doubler.construct(&[])?;
    println!("lazy:     state={} get()={}", l.get("state"), l.invoke("get", &[])?);
    l.invoke("set", &[Value::from(3)])?;
    println!("          after set(3) get()={}", l.invoke("get", &[])?);

    println!(
        "instanceof: doubler={} num={} object={} lazy={}",
        d.instance_of(&doubler),
        d.instance_of(&num),
        d.instance_of(&ctx.object()),
        d.instance_of(&lazy_doubler)
    );

    match ctx.classify(
        Some(&num),
        Members::new().method(
            "reset",
            Function::from_signature("function($super)", |_, _| Ok(Value::Undefined)),
        ),
    ) {
        Ok(_) => println!("unexpected: reset override accepted"),
        Err(e) => println!("rejected:   {}", e),
    }

    Ok(())
}
