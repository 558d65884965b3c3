use minischeme::interpreter::{ErrorKind, Interpreter};

fn session() -> Interpreter {
    Interpreter::new()
}

fn run(interpreter: &Interpreter, line: &str) -> String {
    match interpreter.run(line) {
        Ok(output) => output,
        Err(e) => panic!("{:?} failed: {}", line, e),
    }
}

fn kind_of(interpreter: &Interpreter, line: &str) -> ErrorKind {
    match interpreter.run(line) {
        Ok(output) => panic!("{:?} unexpectedly produced {:?}", line, output),
        Err(e) => e.kind(),
    }
}

#[test]
fn self_evaluating_forms() {
    let scheme = session();
    assert_eq!(run(&scheme, "42"), "42");
    assert_eq!(run(&scheme, "-17"), "-17");
    assert_eq!(run(&scheme, "#t"), "#t");
    assert_eq!(run(&scheme, "#f"), "#f");
}

#[test]
fn quoting() {
    let scheme = session();
    assert_eq!(run(&scheme, "'foo"), "foo");
    assert_eq!(run(&scheme, "(quote (1 2 3))"), "(1 2 3)");
    assert_eq!(run(&scheme, "'(1 . 2)"), "(1 . 2)");
    assert_eq!(run(&scheme, "''x"), "(quote x)");
    assert_eq!(run(&scheme, "'()"), "()");
}

#[test]
fn arithmetic() {
    let scheme = session();
    assert_eq!(run(&scheme, "(+ 1 2 3 4)"), "10");
    assert_eq!(run(&scheme, "(- 10 1 2)"), "7");
    assert_eq!(run(&scheme, "(* 2 (+ 1 2))"), "6");
    assert_eq!(run(&scheme, "(/ 17 5)"), "3");
    assert_eq!(run(&scheme, "(/ -17 5)"), "-3");
    assert_eq!(run(&scheme, "(max 3 1 4 1 5)"), "5");
    assert_eq!(run(&scheme, "(min 3 1 4 1 5)"), "1");
    assert_eq!(run(&scheme, "(abs -42)"), "42");
}

#[test]
fn comparisons() {
    let scheme = session();
    assert_eq!(run(&scheme, "(= 2 2 2)"), "#t");
    assert_eq!(run(&scheme, "(< 1 2 4 8)"), "#t");
    assert_eq!(run(&scheme, "(<= 1 1 2)"), "#t");
    assert_eq!(run(&scheme, "(> 3 2 1)"), "#t");
    assert_eq!(run(&scheme, "(>= 3 3 1)"), "#t");
    assert_eq!(run(&scheme, "(< 1 3 2)"), "#f");
}

#[test]
fn definitions_and_assignment() {
    let scheme = session();
    assert_eq!(run(&scheme, "(define x 3)"), "()");
    assert_eq!(run(&scheme, "x"), "3");
    assert_eq!(run(&scheme, "(set! x (+ x 1))"), "()");
    assert_eq!(run(&scheme, "x"), "4");
    assert_eq!(kind_of(&scheme, "(set! y 1)"), ErrorKind::Name);
}

#[test]
fn closures_capture_their_defining_frame() {
    let scheme = session();
    run(&scheme, "(define (make-adder n) (lambda (m) (+ n m)))");
    run(&scheme, "(define add2 (make-adder 2))");
    run(&scheme, "(define add10 (make-adder 10))");
    assert_eq!(run(&scheme, "(add2 5)"), "7");
    assert_eq!(run(&scheme, "(add10 5)"), "15");
}

#[test]
fn recursion() {
    let scheme = session();
    run(
        &scheme,
        "(define (fact n) (if (= n 0) 1 (* n (fact (- n 1)))))",
    );
    assert_eq!(run(&scheme, "(fact 10)"), "3628800");
    run(
        &scheme,
        "(define (fib n) (if (< n 2) n (+ (fib (- n 1)) (fib (- n 2)))))",
    );
    assert_eq!(run(&scheme, "(fib 10)"), "55");
}

#[test]
fn counter_closure_mutates_its_own_state() {
    let scheme = session();
    run(
        &scheme,
        "(define (make-counter) (define count 0) (lambda () (set! count (+ count 1)) count))",
    );
    run(&scheme, "(define tick (make-counter))");
    assert_eq!(run(&scheme, "(tick)"), "1");
    assert_eq!(run(&scheme, "(tick)"), "2");
    run(&scheme, "(define tock (make-counter))");
    assert_eq!(run(&scheme, "(tock)"), "1");
    assert_eq!(run(&scheme, "(tick)"), "3");
}

#[test]
fn list_operations() {
    let scheme = session();
    assert_eq!(run(&scheme, "(cons 1 2)"), "(1 . 2)");
    assert_eq!(run(&scheme, "(cons 1 '(2 3))"), "(1 2 3)");
    assert_eq!(run(&scheme, "(list 1 (+ 1 1) 3)"), "(1 2 3)");
    assert_eq!(run(&scheme, "(car '(1 2 3))"), "1");
    assert_eq!(run(&scheme, "(cdr '(1 2 3))"), "(2 3)");
    assert_eq!(run(&scheme, "(list-ref '(a b c) 2)"), "c");
    assert_eq!(run(&scheme, "(list-tail '(a b c) 1)"), "(b c)");
    assert_eq!(run(&scheme, "(list-tail '(a b c) 3)"), "()");
}

#[test]
fn shared_structure_is_mutated_in_place() {
    let scheme = session();
    run(&scheme, "(define p (cons 1 2))");
    run(&scheme, "(define q (cons p p))");
    run(&scheme, "(set-car! p 99)");
    assert_eq!(run(&scheme, "(car (car q))"), "99");
    assert_eq!(run(&scheme, "(car (cdr q))"), "99");
}

#[test]
fn predicates() {
    let scheme = session();
    assert_eq!(run(&scheme, "(number? 1)"), "#t");
    assert_eq!(run(&scheme, "(symbol? 'x)"), "#t");
    assert_eq!(run(&scheme, "(boolean? #f)"), "#t");
    assert_eq!(run(&scheme, "(null? '())"), "#t");
    assert_eq!(run(&scheme, "(pair? (cons 1 2))"), "#t");
    assert_eq!(run(&scheme, "(pair? '(1 2))"), "#t");
    assert_eq!(run(&scheme, "(pair? '(1 2 3))"), "#f");
    assert_eq!(run(&scheme, "(list? '(1 2 3))"), "#t");
    assert_eq!(run(&scheme, "(list? '(1 . 2))"), "#f");
    assert_eq!(run(&scheme, "(not #f)"), "#t");
    assert_eq!(run(&scheme, "(not '())"), "#f");
}

#[test]
fn conditionals_and_boolean_forms() {
    let scheme = session();
    assert_eq!(run(&scheme, "(if (< 1 2) 'yes 'no)"), "yes");
    assert_eq!(run(&scheme, "(if #f 'yes 'no)"), "no");
    assert_eq!(run(&scheme, "(if 0 'yes 'no)"), "yes");
    assert_eq!(run(&scheme, "(if #f 'yes)"), "()");
    assert_eq!(run(&scheme, "(and 1 2 3)"), "3");
    assert_eq!(run(&scheme, "(or #f 7 boom)"), "7");
    assert_eq!(run(&scheme, "(and #f boom)"), "#f");
}

#[test]
fn single_form_per_line() {
    let scheme = session();
    assert_eq!(kind_of(&scheme, "1 2"), ErrorKind::Syntax);
    assert_eq!(kind_of(&scheme, "(+ 1 2) (+ 3 4)"), ErrorKind::Syntax);
}

#[test]
fn syntax_errors() {
    let scheme = session();
    assert_eq!(kind_of(&scheme, "(1 2"), ErrorKind::Syntax);
    assert_eq!(kind_of(&scheme, ")"), ErrorKind::Syntax);
    assert_eq!(kind_of(&scheme, "(1 . 2 3)"), ErrorKind::Syntax);
    assert_eq!(kind_of(&scheme, "(1 @)"), ErrorKind::Syntax);
    assert_eq!(kind_of(&scheme, "(if #t)"), ErrorKind::Syntax);
    assert_eq!(kind_of(&scheme, "(define 5 1)"), ErrorKind::Syntax);
    assert_eq!(kind_of(&scheme, "(lambda (x 1) x)"), ErrorKind::Syntax);
}

#[test]
fn name_errors() {
    let scheme = session();
    assert_eq!(kind_of(&scheme, "nope"), ErrorKind::Name);
    assert_eq!(kind_of(&scheme, "(+ 1 nope)"), ErrorKind::Name);
}

#[test]
fn runtime_errors() {
    let scheme = session();
    assert_eq!(kind_of(&scheme, "(/ 1 0)"), ErrorKind::Runtime);
    assert_eq!(kind_of(&scheme, "(car 5)"), ErrorKind::Runtime);
    assert_eq!(kind_of(&scheme, "(+ 1 #t)"), ErrorKind::Runtime);
    assert_eq!(kind_of(&scheme, "()"), ErrorKind::Runtime);
    assert_eq!(kind_of(&scheme, "(5 1)"), ErrorKind::Runtime);
    assert_eq!(kind_of(&scheme, "(list-ref '(1) 5)"), ErrorKind::Runtime);
    assert_eq!(kind_of(&scheme, "(cons 1)"), ErrorKind::Runtime);
    run(&scheme, "(define (f x) x)");
    assert_eq!(kind_of(&scheme, "(f 1 2)"), ErrorKind::Runtime);
}

#[test]
fn callables_have_no_printed_form() {
    let scheme = session();
    assert_eq!(kind_of(&scheme, "+"), ErrorKind::Runtime);
    assert_eq!(kind_of(&scheme, "(lambda (x) x)"), ErrorKind::Runtime);
    // The value is still usable; only printing it is rejected.
    assert_eq!(run(&scheme, "((lambda (x) x) 9)"), "9");
}

#[test]
fn errors_do_not_poison_the_session() {
    let scheme = session();
    run(&scheme, "(define x 1)");
    assert_eq!(kind_of(&scheme, "(/ 1 0)"), ErrorKind::Runtime);
    assert_eq!(run(&scheme, "x"), "1");
    assert_eq!(run(&scheme, "(+ x 1)"), "2");
}

#[test]
fn wrapping_arithmetic() {
    let scheme = session();
    assert_eq!(
        run(&scheme, "(+ 9223372036854775807 1)"),
        "-9223372036854775808"
    );
    assert_eq!(
        run(&scheme, "(- -9223372036854775808 1)"),
        "9223372036854775807"
    );
    // abs has no positive counterpart for the minimum value; it wraps too.
    assert_eq!(
        run(&scheme, "(abs -9223372036854775808)"),
        "-9223372036854775808"
    );
}

#[test]
fn printed_output_reparses() {
    let scheme = session();
    for input in &["(1 2 3)", "(1 . 2)", "((1 2) (3 . 4))", "42", "#t", "()"] {
        let printed = run(&scheme, &format!("'{}", input));
        assert_eq!(&printed, input);
        let again = run(&scheme, &format!("'{}", printed));
        assert_eq!(again, printed);
    }
}
