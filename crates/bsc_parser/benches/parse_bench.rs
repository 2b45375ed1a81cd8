use bsc_parser::{ParseMode, ParseOptions, Parser};
use bsc_scanner::Lexer;
use bumpalo::Bump;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

// A medium-size BrighterScript source with the common constructs
const BRIGHTERSCRIPT_SOURCE: &str = r#"
' Channel entry point
sub Main(args as object)
    screen = CreateObject("roSGScreen")
    port = CreateObject("roMessagePort")
    screen.setMessagePort(port)
    scene = screen.CreateScene("HomeScene")
    screen.show()

    while true
        msg = wait(0, port)
        msgType = type(msg)
        if msgType = "roSGScreenEvent"
            if msg.isScreenClosed() then return
        end if
    end while
end sub

' Build the content tree for the home grid
function buildContent(items as object, title = "Home" as string) as object
    content = CreateObject("roSGNode", "ContentNode")
    content.title = title
    for i = 0 to items.count() - 1 step 1
        item = items[i]
        child = content.createChild("ContentNode")
        child.title = item.title <> invalid ? item.title : "Untitled"
        child.hdPosterUrl = item.poster
        child.description = item.description
    end for
    return content
end function

function filterByRating(items as object, minimum as float) as object
    result = []
    for each item in items
        'skip unrated items
        if item.rating = invalid then
            continue = false
        else if item.rating >= minimum and not item.hidden
            result.push(item)
        end if
    next
    return result
end function

function describe(user as object) as string
    settings = {
        theme: "dark",
        "autoplay": true,
        volume: 11
    }
    label = user = invalid ? "guest" : user.name + " (" + settings.theme + ")"
    handler = function(event as object) as boolean
        print "event: "; event.getField()
        return event.getData() <> invalid
    end function
    m.top.observeField("focusedChild", "onFocusChanged")
    return label
end function

sub onFocusChanged()
    count = m.top.focusedChild <> invalid ? m.top.focusedChild.count() : 0
    count++
    m.total += count * 2 ^ 3 mod 5
    ? "focus changed", count
end sub
"#;

fn bench_parse_brighterscript(c: &mut Criterion) {
    let scanned = Lexer::scan(BRIGHTERSCRIPT_SOURCE);
    let options = ParseOptions { mode: ParseMode::BrighterScript };
    c.bench_function("parse_brighterscript_medium", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let result = Parser::parse(&arena, black_box(&scanned.tokens), options);
            black_box(result.statements.len());
        });
    });
}

fn bench_scan_and_parse(c: &mut Criterion) {
    c.bench_function("scan_and_parse_brighterscript_medium", |b| {
        b.iter(|| {
            let arena = Bump::new();
            let scanned = Lexer::scan(black_box(BRIGHTERSCRIPT_SOURCE));
            let result = Parser::parse(&arena, &scanned.tokens, ParseOptions { mode: ParseMode::BrighterScript });
            black_box(result.diagnostics.len());
        });
    });
}

criterion_group!(benches, bench_parse_brighterscript, bench_scan_and_parse);
criterion_main!(benches);
