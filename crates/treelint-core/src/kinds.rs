//! The closed table of ESTree node kinds.
//!
//! Every kind appears exactly once, with the name of its [`Visitor`] method
//! and its child fields in canonical traversal order. The table is expanded
//! by `define_node_kind!` into [`NodeKind`] and by `define_visitor!` into
//! the [`Visitor`] trait, so adding a kind here updates both.
//!
//! [`Visitor`]: crate::Visitor
//! [`NodeKind`]: crate::NodeKind

macro_rules! with_node_kinds {
    ($callback:ident) => {
        $callback! {
            ArrayExpression => array_expression ["elements"],
            ArrayPattern => array_pattern ["elements"],
            ArrowFunctionExpression => arrow_function_expression ["params", "body"],
            AssignmentExpression => assignment_expression ["left", "right"],
            AssignmentPattern => assignment_pattern ["left", "right"],
            AwaitExpression => await_expression ["argument"],
            BinaryExpression => binary_expression ["left", "right"],
            BlockStatement => block_statement ["body"],
            BreakStatement => break_statement ["label"],
            CallExpression => call_expression ["callee", "arguments"],
            CatchClause => catch_clause ["param", "body"],
            ChainExpression => chain_expression ["expression"],
            ClassBody => class_body ["body"],
            ClassDeclaration => class_declaration ["id", "superClass", "body"],
            ClassExpression => class_expression ["id", "superClass", "body"],
            ConditionalExpression => conditional_expression ["test", "consequent", "alternate"],
            ContinueStatement => continue_statement ["label"],
            DebuggerStatement => debugger_statement [],
            DoWhileStatement => do_while_statement ["body", "test"],
            EmptyStatement => empty_statement [],
            ExportAllDeclaration => export_all_declaration ["exported", "source"],
            ExportDefaultDeclaration => export_default_declaration ["declaration"],
            ExportNamedDeclaration => export_named_declaration ["declaration", "specifiers", "source"],
            ExportSpecifier => export_specifier ["local", "exported"],
            ExpressionStatement => expression_statement ["expression"],
            ForInStatement => for_in_statement ["left", "right", "body"],
            ForOfStatement => for_of_statement ["left", "right", "body"],
            ForStatement => for_statement ["init", "test", "update", "body"],
            FunctionDeclaration => function_declaration ["id", "params", "body"],
            FunctionExpression => function_expression ["id", "params", "body"],
            Identifier => identifier [],
            IfStatement => if_statement ["test", "consequent", "alternate"],
            ImportDeclaration => import_declaration ["specifiers", "source"],
            ImportDefaultSpecifier => import_default_specifier ["local"],
            ImportExpression => import_expression ["source"],
            ImportNamespaceSpecifier => import_namespace_specifier ["local"],
            ImportSpecifier => import_specifier ["imported", "local"],
            LabeledStatement => labeled_statement ["label", "body"],
            Literal => literal [],
            LogicalExpression => logical_expression ["left", "right"],
            MemberExpression => member_expression ["object", "property"],
            MetaProperty => meta_property ["meta", "property"],
            MethodDefinition => method_definition ["key", "value"],
            NewExpression => new_expression ["callee", "arguments"],
            ObjectExpression => object_expression ["properties"],
            ObjectPattern => object_pattern ["properties"],
            PrivateIdentifier => private_identifier [],
            Program => program ["body"],
            Property => property ["key", "value"],
            PropertyDefinition => property_definition ["key", "value"],
            RestElement => rest_element ["argument"],
            ReturnStatement => return_statement ["argument"],
            SequenceExpression => sequence_expression ["expressions"],
            SpreadElement => spread_element ["argument"],
            StaticBlock => static_block ["body"],
            Super => super_node [],
            SwitchCase => switch_case ["test", "consequent"],
            SwitchStatement => switch_statement ["discriminant", "cases"],
            TaggedTemplateExpression => tagged_template_expression ["tag", "quasi"],
            TemplateElement => template_element [],
            TemplateLiteral => template_literal ["quasis", "expressions"],
            ThisExpression => this_expression [],
            ThrowStatement => throw_statement ["argument"],
            TryStatement => try_statement ["block", "handler", "finalizer"],
            UnaryExpression => unary_expression ["argument"],
            UpdateExpression => update_expression ["argument"],
            VariableDeclaration => variable_declaration ["declarations"],
            VariableDeclarator => variable_declarator ["id", "init"],
            WhileStatement => while_statement ["test", "body"],
            WithStatement => with_statement ["object", "body"],
            YieldExpression => yield_expression ["argument"],
        }
    };
}
