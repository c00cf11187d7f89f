use ownership_lib::buffer::DynamicBuffer;
use ownership_lib::handle::OwningHandle;
use ownership_lib::owner::{OwnerError, ResourceOwner};
use ownership_lib::scope::{Journal, Scope, Tracer};
use tracing_subscriber::EnvFilter;

fn fn_c(parent: &Scope) -> Result<(), OwnerError> {
    let mut scope = parent.nested("fn_c");
    scope.acquire("c", || ResourceOwner::new("cccccccccc"))?;
    Ok(())
}

fn fn_b(parent: &Scope) -> Result<(), OwnerError> {
    let mut scope = parent.nested("fn_b");
    scope.acquire("b", || ResourceOwner::new("b"))?;
    fn_c(&scope)
}

fn consumer(handle: OwningHandle<Tracer>) {
    println!("(consumer) owns: {:?}", handle.get().map(Tracer::name));
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "ownership_lib=debug".into()),
        )
        .with_target(false)
        .init();

    println!("\n[DynamicBuffer]\n");

    let mut string = match DynamicBuffer::new(115) {
        Ok(string) => string,
        Err(error) => {
            eprintln!("{error}");
            return;
        }
    };

    for line in [
        "Starbuck! Whadya hear?",
        "Nothin' but the rain.",
        "Grab your gun and bring the cat in.",
        "Aye-aye sir, coming home.",
        "Galactica!",
    ] {
        if let Err(error) = string.append(line) {
            println!("String was not long enough to append another message: {error}");
        }
    }
    print!("{}", string.tagged("A"));

    let mut copy = string.clone();
    let mut moved = DynamicBuffer::default();
    moved.move_from(&mut copy);
    println!("copy moved-from: {}, moved len: {}", copy.is_moved_from(), moved.len());

    println!("\n[ResourceOwner]\n");

    match ResourceOwner::new("x") {
        Ok(x) => println!("x is alive: {:?}", x.content()),
        Err(error) => println!("x failed: {error}"),
    }

    println!("\n[Call stack unwinding]\n");

    let journal = Journal::new();
    let result = (|| -> Result<(), OwnerError> {
        let mut scope = Scope::with_journal("try", journal.clone());
        scope.acquire("a", || ResourceOwner::new("a"))?;
        fn_b(&scope)?;
        scope.acquire("d", || ResourceOwner::new("d"))?;
        Ok(())
    })();

    if let Err(error) = result {
        println!("Exception: {error}");
    }
    println!("released in order: {:?}", journal.released());

    println!("\n[OwningHandle]\n");

    let mut ptr_a = OwningHandle::new_with(Tracer::new("ptr_a"));
    println!("(main) ptr_a: {:?}", ptr_a.get().map(Tracer::name));
    consumer(ptr_a.take());
    println!("(main) ptr_a: {:?}", ptr_a.get().map(Tracer::name));

    let mut ptr_b = OwningHandle::new_with(Tracer::new("ptr_b"));
    let released = ptr_b.release();
    println!("(main) ptr_b released, empty: {}", ptr_b.is_empty());
    drop(released);
}
